use chrono::{DateTime, Utc};
use hallostories_common::records::{StoryRecord, VoteRecord};
use hallostories_common::story::{Story, StoryStatus};
use hallostories_common::vote::Vote;
use hallostories_common::{
    CREATED_FIELD_NAME, ID_FIELD_NAME, STATUS_FIELD_NAME, STORY_ID_FIELD_NAME,
    SUBMITTED_FIELD_NAME, VOTER_FIELD_NAME,
};
use sqlx::postgres::PgRow;

pub mod memory;
pub mod repository;

/// A `stories` row mapped onto the domain type
pub struct StoryRow(pub Story);

/// A `votes` row mapped onto the domain type
pub struct VoteRow(pub Vote);

impl TryFrom<PgRow> for StoryRow {
    type Error = anyhow::Error;

    fn try_from(value: PgRow) -> Result<Self, Self::Error> {
        use sqlx::Row;

        let status: String = value.try_get(STATUS_FIELD_NAME)?;
        let submitted_at: DateTime<Utc> = value.try_get(SUBMITTED_FIELD_NAME)?;
        let record = StoryRecord {
            id: value.try_get::<String, _>(ID_FIELD_NAME)?.into(),
            author: value.try_get("author")?,
            title: value.try_get("title")?,
            body: value.try_get("body")?,
            is_real: value.try_get("is_real")?,
            status: status.parse::<StoryStatus>()?,
            submitted_at: Some(submitted_at),
        };

        Ok(StoryRow(record.into_story(submitted_at)?))
    }
}

impl TryFrom<PgRow> for VoteRow {
    type Error = anyhow::Error;

    fn try_from(value: PgRow) -> Result<Self, Self::Error> {
        use sqlx::Row;

        let created_at: DateTime<Utc> = value.try_get(CREATED_FIELD_NAME)?;
        let record = VoteRecord {
            voter: value.try_get(VOTER_FIELD_NAME)?,
            story_id: value.try_get::<String, _>(STORY_ID_FIELD_NAME)?.into(),
            guessed_author: value.try_get("guessed_author")?,
            guessed_real: value.try_get("guessed_real")?,
            timestamp: Some(created_at),
        };

        Ok(VoteRow(record.into_vote(created_at)?))
    }
}
