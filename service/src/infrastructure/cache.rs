use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use hallostories_common::GameSnapshot;
use hallostories_common::story::{Moderation, NewStory, Story, StoryId};
use hallostories_common::vote::Vote;
use tokio::sync::RwLock;

use crate::domain::ledger::VoteCandidate;
use crate::domain::repository::{GameRepository, RepositoryError, SubmitVoteError};

struct CachedSnapshot {
    snapshot: Arc<GameSnapshot>,
    loaded_at: Instant,
}

/// Read-through cache of the game snapshot in front of another repository.
///
/// Player-facing reads (approved stories, votes) are served from memory for
/// at most `ttl`. Every mutation drops the cached value, and a fetch that
/// started before a mutation is never stored.
#[derive(Clone)]
pub struct CachedGameRepository<R> {
    inner: R,
    ttl: Duration,
    cached: Arc<RwLock<Option<CachedSnapshot>>>,
    generation: Arc<AtomicU64>,
}

impl<R: GameRepository> CachedGameRepository<R> {
    pub fn new(inner: R, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cached: Arc::new(RwLock::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    async fn load(&self) -> Result<Arc<GameSnapshot>, RepositoryError> {
        if let Some(cached) = self.cached.read().await.as_ref() {
            if cached.loaded_at.elapsed() < self.ttl {
                return Ok(Arc::clone(&cached.snapshot));
            }
        }

        let generation = self.generation.load(Ordering::Acquire);
        let snapshot = Arc::new(self.inner.snapshot().await?);

        let mut cached = self.cached.write().await;
        if self.generation.load(Ordering::Acquire) == generation {
            *cached = Some(CachedSnapshot {
                snapshot: Arc::clone(&snapshot),
                loaded_at: Instant::now(),
            });
        }
        Ok(snapshot)
    }

    async fn invalidate(&self) {
        let mut cached = self.cached.write().await;
        self.generation.fetch_add(1, Ordering::AcqRel);
        *cached = None;
    }
}

impl<R: GameRepository> GameRepository for CachedGameRepository<R> {
    async fn list_stories(&self) -> Result<Vec<Story>, RepositoryError> {
        self.inner.list_stories().await
    }

    async fn list_approved_stories(&self) -> Result<Vec<Story>, RepositoryError> {
        Ok(self.load().await?.stories.clone())
    }

    async fn list_votes(&self) -> Result<Vec<Vote>, RepositoryError> {
        Ok(self.load().await?.votes.clone())
    }

    async fn create_story(&self, story: NewStory) -> Result<Story, RepositoryError> {
        let result = self.inner.create_story(story).await;
        self.invalidate().await;
        result
    }

    async fn moderate_story(
        &self,
        id: StoryId,
        decision: Moderation,
    ) -> Result<Story, RepositoryError> {
        let result = self.inner.moderate_story(id, decision).await;
        self.invalidate().await;
        result
    }

    async fn submit_vote(&self, candidate: VoteCandidate) -> Result<Vote, SubmitVoteError> {
        let result = self.inner.submit_vote(candidate).await;
        if result.is_ok() {
            self.invalidate().await;
        }
        result
    }

    async fn reset(&self) -> Result<(), RepositoryError> {
        let result = self.inner.reset().await;
        self.invalidate().await;
        result
    }

    async fn snapshot(&self) -> Result<GameSnapshot, RepositoryError> {
        Ok(GameSnapshot::clone(&*self.load().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::memory::InMemoryGameRepository;
    use hallostories_common::story::StoryStatus;
    use hallostories_common::test_utils::{approved_story, name, new_story};

    fn cached(inner: &InMemoryGameRepository) -> CachedGameRepository<InMemoryGameRepository> {
        CachedGameRepository::new(inner.clone(), Duration::from_secs(3600))
    }

    #[tokio::test]
    async fn serves_cached_snapshot_until_invalidated() {
        let inner = InMemoryGameRepository::new();
        let repository = cached(&inner);
        assert!(repository.list_approved_stories().await.unwrap().is_empty());

        // bypasses the cache on purpose
        let story = inner.create_story(new_story("Alice", true)).await.unwrap();
        inner
            .moderate_story(story.id.clone(), Moderation::Approve)
            .await
            .unwrap();
        assert!(repository.list_approved_stories().await.unwrap().is_empty());

        repository.invalidate().await;
        assert_eq!(repository.list_approved_stories().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn mutations_are_visible_immediately() {
        let repository = cached(&InMemoryGameRepository::new());
        assert!(repository.snapshot().await.unwrap().stories.is_empty());

        let story = repository.create_story(new_story("Alice", true)).await.unwrap();
        let story = repository
            .moderate_story(story.id, Moderation::Approve)
            .await
            .unwrap();
        assert_eq!(story.status, StoryStatus::Approved);
        assert_eq!(repository.list_approved_stories().await.unwrap().len(), 1);

        let candidate = VoteCandidate {
            voter: name("Bob"),
            story_id: story.id.clone(),
            guessed_author: Some(name("Alice")),
            guessed_real: Some(true),
        };
        repository.submit_vote(candidate).await.unwrap();
        assert_eq!(repository.list_votes().await.unwrap().len(), 1);

        repository.reset().await.unwrap();
        let snapshot = repository.snapshot().await.unwrap();
        assert!(snapshot.stories.is_empty());
        assert!(snapshot.votes.is_empty());
    }

    #[tokio::test]
    async fn admin_listing_is_never_cached() {
        let inner = InMemoryGameRepository::from_snapshot(GameSnapshot {
            stories: vec![approved_story("a", "Alice", true)],
            votes: Vec::new(),
        });
        let repository = cached(&inner);
        assert_eq!(repository.snapshot().await.unwrap().stories.len(), 1);

        inner.create_story(new_story("Bob", false)).await.unwrap();

        assert_eq!(repository.list_stories().await.unwrap().len(), 2);
    }
}
