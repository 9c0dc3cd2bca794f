use std::sync::Arc;

use chrono::Utc;
use hallostories_common::GameSnapshot;
use hallostories_common::story::{Moderation, NewStory, Story, StoryId};
use hallostories_common::vote::Vote;
use tokio::sync::RwLock;

use crate::domain::ledger::{VoteCandidate, VoteLedger};
use crate::domain::repository::{GameRepository, RepositoryError, SubmitVoteError};

#[derive(Debug, Default)]
struct GameState {
    stories: Vec<Story>,
    ledger: VoteLedger,
    next_id: u64,
}

/// Process-local storage, lost on restart.
///
/// A single write lock covers the ledger, so the eligibility check and the
/// append of a vote happen as one step.
#[derive(Clone, Debug, Default)]
pub struct InMemoryGameRepository {
    state: Arc<RwLock<GameState>>,
}

impl InMemoryGameRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from previously exported stories and votes.
    pub fn from_snapshot(snapshot: GameSnapshot) -> Self {
        let mut ledger = VoteLedger::new();
        let stories = snapshot.stories;
        for vote in snapshot.votes {
            let candidate = VoteCandidate {
                voter: vote.voter,
                story_id: vote.story_id,
                guessed_author: Some(vote.guessed_author),
                guessed_real: Some(vote.guessed_real),
            };
            if let Err(err) = ledger.append(&stories, candidate, vote.timestamp) {
                tracing::warn!("skipping imported vote: {}", err);
            }
        }
        let next_id = stories.len() as u64;
        let state = GameState {
            stories,
            ledger,
            next_id,
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }
}

impl GameRepository for InMemoryGameRepository {
    async fn list_stories(&self) -> Result<Vec<Story>, RepositoryError> {
        Ok(self.state.read().await.stories.clone())
    }

    async fn list_approved_stories(&self) -> Result<Vec<Story>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .stories
            .iter()
            .filter(|story| story.is_eligible())
            .cloned()
            .collect())
    }

    async fn list_votes(&self) -> Result<Vec<Vote>, RepositoryError> {
        Ok(self.state.read().await.ledger.votes().to_vec())
    }

    async fn create_story(&self, story: NewStory) -> Result<Story, RepositoryError> {
        let mut state = self.state.write().await;
        let id = loop {
            state.next_id += 1;
            let id = StoryId::from(state.next_id.to_string());
            if !state.stories.iter().any(|story| story.id == id) {
                break id;
            }
        };
        let story = Story::new(id, story, Utc::now());
        state.stories.push(story.clone());
        Ok(story)
    }

    async fn moderate_story(
        &self,
        id: StoryId,
        decision: Moderation,
    ) -> Result<Story, RepositoryError> {
        let mut state = self.state.write().await;
        let story = state
            .stories
            .iter_mut()
            .find(|story| story.id == id)
            .ok_or(RepositoryError::NotFound(id))?;
        story.moderate(decision)?;
        Ok(story.clone())
    }

    async fn submit_vote(&self, candidate: VoteCandidate) -> Result<Vote, SubmitVoteError> {
        let mut state = self.state.write().await;
        let GameState { stories, ledger, .. } = &mut *state;
        Ok(ledger.append(stories, candidate, Utc::now())?)
    }

    async fn reset(&self) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        state.stories.clear();
        state.ledger.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger::VoteError;
    use hallostories_common::story::{ModerationError, StoryStatus};
    use hallostories_common::test_utils::{approved_story, name, new_story, vote};

    fn candidate(voter: &str, story_id: &StoryId) -> VoteCandidate {
        VoteCandidate {
            voter: name(voter),
            story_id: story_id.clone(),
            guessed_author: Some(name("Alice")),
            guessed_real: Some(true),
        }
    }

    #[tokio::test]
    async fn created_stories_wait_for_moderation() {
        let repository = InMemoryGameRepository::new();

        let story = repository.create_story(new_story("Alice", true)).await.unwrap();

        assert_eq!(story.status, StoryStatus::Pending);
        assert!(repository.list_approved_stories().await.unwrap().is_empty());
        assert_eq!(repository.list_stories().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn moderation_is_final() {
        let repository = InMemoryGameRepository::new();
        let story = repository.create_story(new_story("Alice", true)).await.unwrap();

        let approved = repository
            .moderate_story(story.id.clone(), Moderation::Approve)
            .await
            .unwrap();
        let again = repository
            .moderate_story(story.id.clone(), Moderation::Reject)
            .await;

        assert_eq!(approved.status, StoryStatus::Approved);
        assert_eq!(
            again,
            Err(RepositoryError::Moderation(ModerationError::AlreadyModerated(
                StoryStatus::Approved
            )))
        );
    }

    #[tokio::test]
    async fn moderating_unknown_story_is_not_found() {
        let repository = InMemoryGameRepository::new();

        let result = repository
            .moderate_story(StoryId::from("missing"), Moderation::Approve)
            .await;

        assert_eq!(result, Err(RepositoryError::NotFound(StoryId::from("missing"))));
    }

    #[tokio::test]
    async fn concurrent_duplicates_store_a_single_vote() {
        let repository = InMemoryGameRepository::from_snapshot(GameSnapshot {
            stories: vec![approved_story("a", "Alice", true)],
            votes: Vec::new(),
        });
        let id = StoryId::from("a");

        let handles = (0..8)
            .map(|_| {
                let repository = repository.clone();
                let candidate = candidate("Carol", &id);
                tokio::spawn(async move { repository.submit_vote(candidate).await })
            })
            .collect::<Vec<_>>();

        let mut accepted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => accepted += 1,
                Err(err) => assert_eq!(err, SubmitVoteError::Rejected(VoteError::AlreadyVoted)),
            }
        }

        assert_eq!(accepted, 1);
        assert_eq!(repository.list_votes().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn reset_clears_everything() {
        let repository = InMemoryGameRepository::from_snapshot(GameSnapshot {
            stories: vec![approved_story("a", "Alice", true)],
            votes: vec![vote("Carol", "a", "Alice", true)],
        });
        assert_eq!(repository.list_votes().await.unwrap().len(), 1);

        repository.reset().await.unwrap();

        let snapshot = repository.snapshot().await.unwrap();
        assert!(snapshot.stories.is_empty());
        assert!(snapshot.votes.is_empty());
    }

    #[tokio::test]
    async fn generated_ids_skip_imported_ones() {
        let repository = InMemoryGameRepository::from_snapshot(GameSnapshot {
            stories: vec![approved_story("2", "Alice", true)],
            votes: Vec::new(),
        });

        let story = repository.create_story(new_story("Bob", false)).await.unwrap();

        assert_eq!(story.id, StoryId::from("3"));
    }
}
