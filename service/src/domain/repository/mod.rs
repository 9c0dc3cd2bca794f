use std::future::Future;

use hallostories_common::GameSnapshot;
use hallostories_common::story::{Moderation, ModerationError, NewStory, Story, StoryId};
use hallostories_common::vote::Vote;
use thiserror::Error;

use crate::domain::ledger::{VoteCandidate, VoteError};

/// Durable storage of the game: stories and the vote ledger.
///
/// Implementations must enforce `(voter, story)` uniqueness atomically when
/// a vote is stored, and must clear both collections in one step on reset.
pub trait GameRepository: Clone + Send + Sync + 'static {
    /// All stories regardless of status, in submission order
    fn list_stories(&self) -> impl Future<Output = Result<Vec<Story>, RepositoryError>> + Send;

    /// Stories open for voting, in submission order
    fn list_approved_stories(
        &self,
    ) -> impl Future<Output = Result<Vec<Story>, RepositoryError>> + Send;

    /// The full ledger in casting order
    fn list_votes(&self) -> impl Future<Output = Result<Vec<Vote>, RepositoryError>> + Send;

    /// Stores a new story as pending
    fn create_story(
        &self,
        story: NewStory,
    ) -> impl Future<Output = Result<Story, RepositoryError>> + Send;

    /// Moves a pending story to approved or rejected
    fn moderate_story(
        &self,
        id: StoryId,
        decision: Moderation,
    ) -> impl Future<Output = Result<Story, RepositoryError>> + Send;

    /// Runs the eligibility rule and appends the vote if it passes
    fn submit_vote(
        &self,
        candidate: VoteCandidate,
    ) -> impl Future<Output = Result<Vote, SubmitVoteError>> + Send;

    /// Removes every story and every vote
    fn reset(&self) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Approved stories together with the ledger
    fn snapshot(&self) -> impl Future<Output = Result<GameSnapshot, RepositoryError>> + Send {
        async move {
            let stories = self.list_approved_stories().await?;
            let votes = self.list_votes().await?;
            Ok(GameSnapshot { stories, votes })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RepositoryError {
    #[error("story {0} not found")]
    NotFound(StoryId),
    #[error(transparent)]
    Moderation(#[from] ModerationError),
    #[error("database error: {0}")]
    DatabaseError(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitVoteError {
    #[error(transparent)]
    Rejected(#[from] VoteError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
