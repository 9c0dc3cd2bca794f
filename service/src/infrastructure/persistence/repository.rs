use hallostories_common::database::Database;
use hallostories_common::story::{
    Moderation, ModerationError, NewStory, Story, StoryId, StoryStatus,
};
use hallostories_common::vote::Vote;
use sqlx::postgres::PgRow;

use crate::domain::ledger::{VoteCandidate, VoteError};
use crate::domain::repository::{GameRepository, RepositoryError, SubmitVoteError};
use crate::infrastructure::persistence::{StoryRow, VoteRow};

#[derive(Clone, Debug)]
pub struct PostgresGameRepository {
    database: &'static Database,
}

const STORY_COLUMNS: &str = "id, author, title, body, is_real, status, submitted_at";
const VOTE_COLUMNS: &str = "voter, story_id, guessed_author, guessed_real, created_at";

impl PostgresGameRepository {
    pub fn new(database: &'static Database) -> Self {
        Self { database }
    }

    async fn fetch_stories(&self, sql: &str) -> Result<Vec<Story>, RepositoryError> {
        let rows = sqlx::query(sql)
            .fetch_all(self.database.database_pool())
            .await
            .map_err(database_error)?;

        rows.into_iter().map(story_from_row).collect()
    }

    async fn has_voted(&self, voter: &str, story_id: &str) -> Result<bool, RepositoryError> {
        let sql = "SELECT EXISTS (SELECT 1 FROM votes WHERE voter = $1 AND story_id = $2)";
        sqlx::query_scalar::<_, bool>(sql)
            .bind(voter)
            .bind(story_id)
            .fetch_one(self.database.database_pool())
            .await
            .map_err(database_error)
    }
}

fn database_error(err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::DatabaseError(err.to_string())
}

fn story_from_row(row: PgRow) -> Result<Story, RepositoryError> {
    StoryRow::try_from(row)
        .map(|StoryRow(story)| story)
        .map_err(database_error)
}

fn vote_from_row(row: PgRow) -> Result<Vote, RepositoryError> {
    VoteRow::try_from(row)
        .map(|VoteRow(vote)| vote)
        .map_err(database_error)
}

impl GameRepository for PostgresGameRepository {
    async fn list_stories(&self) -> Result<Vec<Story>, RepositoryError> {
        let sql = format!("SELECT {} FROM stories ORDER BY position", STORY_COLUMNS);
        self.fetch_stories(&sql).await
    }

    async fn list_approved_stories(&self) -> Result<Vec<Story>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM stories WHERE status = 'approved' ORDER BY position",
            STORY_COLUMNS
        );
        self.fetch_stories(&sql).await
    }

    async fn list_votes(&self) -> Result<Vec<Vote>, RepositoryError> {
        let sql = format!("SELECT {} FROM votes ORDER BY position", VOTE_COLUMNS);
        let rows = sqlx::query(&sql)
            .fetch_all(self.database.database_pool())
            .await
            .map_err(database_error)?;

        rows.into_iter().map(vote_from_row).collect()
    }

    async fn create_story(&self, story: NewStory) -> Result<Story, RepositoryError> {
        let sql = format!(
            "INSERT INTO stories (author, title, body, is_real) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            STORY_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(story.author.into_inner())
            .bind(story.title.into_inner())
            .bind(story.body.into_inner())
            .bind(story.is_real)
            .fetch_one(self.database.database_pool())
            .await
            .map_err(database_error)?;

        story_from_row(row)
    }

    async fn moderate_story(
        &self,
        id: StoryId,
        decision: Moderation,
    ) -> Result<Story, RepositoryError> {
        // the status guard makes concurrent decisions on one story race-free
        let sql = format!(
            "UPDATE stories SET status = $2, moderated_at = now() \
             WHERE id = $1 AND status = 'pending' RETURNING {}",
            STORY_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id.as_str())
            .bind(decision.target_status().as_str())
            .fetch_optional(self.database.database_pool())
            .await
            .map_err(database_error)?;

        if let Some(row) = row {
            let story = story_from_row(row)?;
            tracing::info!("story {} is now {}", story.id, story.status);
            return Ok(story);
        }

        let status = sqlx::query_scalar::<_, String>("SELECT status FROM stories WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(self.database.database_pool())
            .await
            .map_err(database_error)?;

        match status {
            None => Err(RepositoryError::NotFound(id)),
            Some(status) => {
                let status = status.parse::<StoryStatus>().map_err(database_error)?;
                Err(ModerationError::AlreadyModerated(status).into())
            }
        }
    }

    async fn submit_vote(&self, candidate: VoteCandidate) -> Result<Vote, SubmitVoteError> {
        let voter: &str = candidate.voter.as_ref();
        let story_id = candidate.story_id.as_str();
        let guessed_author: Option<&str> = candidate.guessed_author.as_ref().map(AsRef::as_ref);

        if self.has_voted(voter, story_id).await? {
            return Err(VoteError::AlreadyVoted.into());
        }
        let missing = candidate.missing_fields();
        if !missing.is_empty() {
            return Err(VoteError::IncompleteSelection(missing).into());
        }

        // insert-if-absent: eligibility and uniqueness are decided by this statement alone
        let sql = format!(
            "INSERT INTO votes (voter, story_id, guessed_author, guessed_real) \
             SELECT $1, s.id, $3, $4 FROM stories s WHERE s.id = $2 AND s.status = 'approved' \
             ON CONFLICT (voter, story_id) DO NOTHING RETURNING {}",
            VOTE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(voter)
            .bind(story_id)
            .bind(guessed_author)
            .bind(candidate.guessed_real)
            .fetch_optional(self.database.database_pool())
            .await
            .map_err(database_error)?;

        match row {
            Some(row) => Ok(vote_from_row(row)?),
            None if self.has_voted(voter, story_id).await? => Err(VoteError::AlreadyVoted.into()),
            None => Err(VoteError::StoryNotEligible.into()),
        }
    }

    async fn reset(&self) -> Result<(), RepositoryError> {
        let statements = vec!["TRUNCATE TABLE votes, stories RESTART IDENTITY".to_string()];
        self.database
            .execute_in_transaction(statements, "RESET GAME")
            .await
            .map_err(|err| RepositoryError::DatabaseError(format!("{:#}", err)))
    }
}
