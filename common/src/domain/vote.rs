use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::ParticipantName;
use crate::domain::story::StoryId;

/// One immutable guess about a story: who wrote it and whether it is true.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub voter: ParticipantName,
    pub story_id: StoryId,
    pub guessed_author: ParticipantName,
    pub guessed_real: bool,
    /// Informational only, never used for ordering or scoring.
    pub timestamp: DateTime<Utc>,
}

impl Vote {
    /// Key under which at most one vote may exist.
    pub fn key(&self) -> VoteKey<'_> {
        VoteKey {
            voter: &self.voter,
            story_id: &self.story_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoteKey<'a> {
    pub voter: &'a ParticipantName,
    pub story_id: &'a StoryId,
}
