//! Serialized shapes of stories and votes as they travel over the wire or
//! come out of historical exports.
//!
//! Two naming conventions exist in the wild (`storyId` / `story_id`,
//! `guessedAuthor` / `guessed_author`, ...). Both are accepted here and this
//! is the only place that knows about them: everything past these records
//! works with the canonical domain types.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::story::{NewStory, Story, StoryId, StoryStatus};
use crate::domain::vote::Vote;
use crate::domain::{ParticipantName, StoryBody, StoryTitle};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("invalid value for '{field}': {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
}

impl RecordError {
    fn invalid(field: &'static str, err: impl std::fmt::Display) -> Self {
        Self::InvalidField {
            field,
            message: err.to_string(),
        }
    }
}

/// Story submission as sent by a player
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStoryRecord {
    pub author: Option<String>,
    pub title: Option<String>,
    #[serde(alias = "story")]
    pub body: Option<String>,
    #[serde(alias = "is_real")]
    pub is_real: Option<bool>,
}

impl TryFrom<NewStoryRecord> for NewStory {
    type Error = RecordError;

    fn try_from(value: NewStoryRecord) -> Result<Self, Self::Error> {
        let author = value.author.ok_or(RecordError::MissingField("author"))?;
        let title = value.title.ok_or(RecordError::MissingField("title"))?;
        let body = value.body.ok_or(RecordError::MissingField("body"))?;
        let is_real = value.is_real.ok_or(RecordError::MissingField("isReal"))?;

        Ok(NewStory {
            author: ParticipantName::try_new(author)
                .map_err(|err| RecordError::invalid("author", err))?,
            title: StoryTitle::try_new(title).map_err(|err| RecordError::invalid("title", err))?,
            body: StoryBody::try_new(body).map_err(|err| RecordError::invalid("body", err))?,
            is_real,
        })
    }
}

/// Stored story, including the shape written by the first browser-only
/// version of the game, which had no moderation and kept the text in `story`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryRecord {
    pub id: StoryId,
    pub author: String,
    pub title: String,
    #[serde(alias = "story")]
    pub body: String,
    #[serde(alias = "is_real")]
    pub is_real: bool,
    /// Stories predating moderation were all votable.
    #[serde(default = "legacy_status")]
    pub status: StoryStatus,
    #[serde(alias = "submitted_at", alias = "timestamp")]
    pub submitted_at: Option<DateTime<Utc>>,
}

fn legacy_status() -> StoryStatus {
    StoryStatus::Approved
}

impl StoryRecord {
    pub fn into_story(self, fallback_time: DateTime<Utc>) -> Result<Story, RecordError> {
        let new_story = NewStoryRecord {
            author: Some(self.author),
            title: Some(self.title),
            body: Some(self.body),
            is_real: Some(self.is_real),
        };
        let mut story = Story::new(
            self.id,
            NewStory::try_from(new_story)?,
            self.submitted_at.unwrap_or(fallback_time),
        );
        story.status = self.status;
        Ok(story)
    }
}

/// Vote as sent by a player or found in an export. Guesses are optional here
/// so that an incomplete selection can be reported instead of failing to parse.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    pub voter: String,
    #[serde(alias = "story_id")]
    pub story_id: StoryId,
    #[serde(alias = "guessed_author")]
    pub guessed_author: Option<String>,
    #[serde(alias = "guessed_real")]
    pub guessed_real: Option<bool>,
    #[serde(alias = "created_at")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl VoteRecord {
    pub fn voter(&self) -> Result<ParticipantName, RecordError> {
        ParticipantName::try_new(self.voter.as_str())
            .map_err(|err| RecordError::invalid("voter", err))
    }

    /// Blank guesses count as missing, as an unselected form field does.
    pub fn guessed_author(&self) -> Result<Option<ParticipantName>, RecordError> {
        match self.guessed_author.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(author) => ParticipantName::try_new(author)
                .map(Some)
                .map_err(|err| RecordError::invalid("guessedAuthor", err)),
        }
    }

    pub fn into_vote(self, fallback_time: DateTime<Utc>) -> Result<Vote, RecordError> {
        let voter = self.voter()?;
        let guessed_author = self
            .guessed_author()?
            .ok_or(RecordError::MissingField("guessedAuthor"))?;
        let guessed_real = self
            .guessed_real
            .ok_or(RecordError::MissingField("guessedReal"))?;

        Ok(Vote {
            voter,
            story_id: self.story_id,
            guessed_author,
            guessed_real,
            timestamp: self.timestamp.unwrap_or(fallback_time),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn vote_accepts_both_spellings() {
        let camel: VoteRecord = serde_json::from_value(json!({
            "voter": "Carol",
            "storyId": 17,
            "guessedAuthor": "Bob",
            "guessedReal": true
        }))
        .unwrap();
        let snake: VoteRecord = serde_json::from_value(json!({
            "voter": "Carol",
            "story_id": "17",
            "guessed_author": "Bob",
            "guessed_real": true
        }))
        .unwrap();

        let now = Utc::now();
        let camel = camel.into_vote(now).unwrap();
        let snake = snake.into_vote(now).unwrap();
        assert_eq!(camel, snake);
        assert_eq!(camel.story_id.as_str(), "17");
    }

    #[test]
    fn vote_without_real_guess_is_incomplete() {
        let record: VoteRecord = serde_json::from_value(json!({
            "voter": "Carol",
            "storyId": "a",
            "guessedAuthor": "Bob"
        }))
        .unwrap();

        assert_eq!(
            record.into_vote(Utc::now()),
            Err(RecordError::MissingField("guessedReal"))
        );
    }

    #[test]
    fn blank_author_guess_counts_as_missing() {
        let record: VoteRecord = serde_json::from_value(json!({
            "voter": "Carol",
            "storyId": "a",
            "guessedAuthor": "  ",
            "guessedReal": false
        }))
        .unwrap();

        assert_eq!(record.guessed_author(), Ok(None));
    }

    #[test]
    fn legacy_story_defaults_to_approved() {
        let record: StoryRecord = serde_json::from_value(json!({
            "id": 1698765432123.456,
            "author": "Alice",
            "title": "The attic",
            "story": "Something moved upstairs.",
            "isReal": true,
            "timestamp": "2024-10-31T20:00:00Z"
        }))
        .unwrap();

        let story = record.into_story(Utc::now()).unwrap();
        assert_eq!(story.status, StoryStatus::Approved);
        assert_eq!(story.id.as_str(), "1698765432123.456");
        assert_eq!(story.body.as_ref(), "Something moved upstairs.");
    }

    #[test]
    fn new_story_requires_truth_claim() {
        let record: NewStoryRecord = serde_json::from_value(json!({
            "author": "Alice",
            "title": "The attic",
            "body": "Something moved upstairs."
        }))
        .unwrap();

        assert_eq!(
            NewStory::try_from(record).unwrap_err(),
            RecordError::MissingField("isReal")
        );
    }

    #[test]
    fn new_story_rejects_blank_title() {
        let record: NewStoryRecord = serde_json::from_value(json!({
            "author": "Alice",
            "title": "   ",
            "body": "Something moved upstairs.",
            "isReal": false
        }))
        .unwrap();

        assert!(matches!(
            NewStory::try_from(record),
            Err(RecordError::InvalidField { field: "title", .. })
        ));
    }
}
