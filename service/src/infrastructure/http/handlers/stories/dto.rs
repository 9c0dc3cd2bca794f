use chrono::{DateTime, Utc};
use hallostories_common::ParticipantName;
use hallostories_common::story::{Story, StoryId, StoryStatus};
use itertools::Itertools;
use serde::Serialize;

/// A story as shown to players: who wrote it and whether it is true stay hidden.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicStoryResponse {
    id: StoryId,
    title: String,
    body: String,
    submitted_at: DateTime<Utc>,
}

impl From<Story> for PublicStoryResponse {
    fn from(value: Story) -> Self {
        Self {
            id: value.id,
            title: value.title.into_inner(),
            body: value.body.into_inner(),
            submitted_at: value.submitted_at,
        }
    }
}

/// Response for the public story list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManyStoriesResponse {
    data: Vec<PublicStoryResponse>,
    meta: StoriesMetadataResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoriesMetadataResponse {
    total: usize,
    /// Names to choose from when guessing, sorted and deduplicated
    authors: Vec<ParticipantName>,
}

impl From<Vec<Story>> for ManyStoriesResponse {
    fn from(value: Vec<Story>) -> Self {
        let authors = value
            .iter()
            .map(|story| story.author.clone())
            .sorted()
            .dedup()
            .collect();
        let meta = StoriesMetadataResponse {
            total: value.len(),
            authors,
        };
        let data = value.into_iter().map(PublicStoryResponse::from).collect();
        Self { data, meta }
    }
}

/// Moderation queue for the admin view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModerationOverviewResponse {
    pending: Vec<Story>,
    approved: Vec<Story>,
    rejected: Vec<Story>,
    counts: ModerationCountsResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModerationCountsResponse {
    pending: usize,
    approved: usize,
    rejected: usize,
}

impl From<Vec<Story>> for ModerationOverviewResponse {
    fn from(value: Vec<Story>) -> Self {
        let mut by_status = value.into_iter().into_group_map_by(|story| story.status);
        let pending = by_status.remove(&StoryStatus::Pending).unwrap_or_default();
        let approved = by_status.remove(&StoryStatus::Approved).unwrap_or_default();
        let rejected = by_status.remove(&StoryStatus::Rejected).unwrap_or_default();
        let counts = ModerationCountsResponse {
            pending: pending.len(),
            approved: approved.len(),
            rejected: rejected.len(),
        };
        Self {
            pending,
            approved,
            rejected,
            counts,
        }
    }
}
