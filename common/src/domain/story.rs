use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::domain::{ParticipantName, StoryBody, StoryTitle};

/// Canonical story identifier.
///
/// Identifiers were historically produced both as JSON numbers
/// (`1698765432123.456`) and as strings. Both are normalised into their
/// string form on deserialization, so identifiers are always compared as text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct StoryId(String);

impl StoryId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StoryId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for StoryId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<StoryId> for String {
    fn from(value: StoryId) -> Self {
        value.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStoryId {
    Text(String),
    Number(serde_json::Number),
}

impl<'de> Deserialize<'de> for StoryId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        let id = match RawStoryId::deserialize(deserializer)? {
            RawStoryId::Text(text) => StoryId::new(text),
            RawStoryId::Number(number) => StoryId::new(number.to_string()),
        };

        if id.0.is_empty() {
            return Err(D::Error::custom("story id must not be empty"));
        }
        Ok(id)
    }
}

/// Moderation state of a story. `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryStatus {
    Pending,
    Approved,
    Rejected,
}

impl StoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoryStatus::Pending => "pending",
            StoryStatus::Approved => "approved",
            StoryStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for StoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoryStatus {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(StoryStatus::Pending),
            "approved" => Ok(StoryStatus::Approved),
            "rejected" => Ok(StoryStatus::Rejected),
            other => Err(anyhow::anyhow!("unknown story status '{}'", other)),
        }
    }
}

/// Decision taken by a moderator on a pending story
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Moderation {
    Approve,
    Reject,
}

impl Moderation {
    pub fn target_status(self) -> StoryStatus {
        match self {
            Moderation::Approve => StoryStatus::Approved,
            Moderation::Reject => StoryStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModerationError {
    #[error("story has already been {0}")]
    AlreadyModerated(StoryStatus),
}

/// A submitted story, validated but not yet stored
#[derive(Debug, Clone)]
pub struct NewStory {
    pub author: ParticipantName,
    pub title: StoryTitle,
    pub body: StoryBody,
    pub is_real: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: StoryId,
    pub author: ParticipantName,
    pub title: StoryTitle,
    pub body: StoryBody,
    pub is_real: bool,
    pub status: StoryStatus,
    pub submitted_at: DateTime<Utc>,
}

impl Story {
    pub fn new(id: StoryId, story: NewStory, submitted_at: DateTime<Utc>) -> Self {
        Self {
            id,
            author: story.author,
            title: story.title,
            body: story.body,
            is_real: story.is_real,
            status: StoryStatus::Pending,
            submitted_at,
        }
    }

    /// Only approved stories can be read and voted on by players.
    pub fn is_eligible(&self) -> bool {
        self.status == StoryStatus::Approved
    }

    /// Applies a moderation decision. A story leaves `Pending` exactly once.
    pub fn moderate(&mut self, decision: Moderation) -> Result<(), ModerationError> {
        match self.status {
            StoryStatus::Pending => {
                self.status = decision.target_status();
                Ok(())
            }
            status => Err(ModerationError::AlreadyModerated(status)),
        }
    }
}
