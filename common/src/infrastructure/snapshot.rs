use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use serde::Deserialize;

use crate::domain::story::Story;
use crate::domain::vote::Vote;
use crate::infrastructure::records::{StoryRecord, VoteRecord};

/// Full game state exported from an earlier deployment: every story in
/// submission order and the vote ledger in casting order.
#[derive(Debug, Clone, Default)]
pub struct GameSnapshot {
    pub stories: Vec<Story>,
    pub votes: Vec<Vote>,
}

#[derive(Debug, Deserialize)]
struct SnapshotRecord {
    #[serde(default, alias = "hallostories_stories")]
    stories: Vec<serde_json::Value>,
    #[serde(default, alias = "hallostories_votes")]
    votes: Vec<serde_json::Value>,
}

pub fn load(path: &str) -> Result<GameSnapshot, anyhow::Error> {
    use std::fs;

    let path = Path::new(path);
    tracing::debug!("Loading snapshot from {}", path.to_string_lossy());

    let display = path.to_string_lossy();
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot file '{}'", display))?;

    parse(&content).with_context(|| format!("failed to parse snapshot '{}'", display))
}

/// Parses a snapshot, skipping records that cannot be salvaged.
///
/// Entries are parsed one by one so a single malformed story or vote does
/// not discard the rest of the export. Repeated `(voter, story)` pairs keep
/// the first vote only.
pub fn parse(content: &str) -> Result<GameSnapshot, anyhow::Error> {
    let record: SnapshotRecord = serde_json::from_str(content)?;
    let now = Utc::now();

    let mut stories = Vec::with_capacity(record.stories.len());
    let mut story_ids = HashSet::new();
    for (index, value) in record.stories.into_iter().enumerate() {
        let story = serde_json::from_value::<StoryRecord>(value)
            .map_err(anyhow::Error::from)
            .and_then(|record| record.into_story(now).map_err(anyhow::Error::from));
        match story {
            Ok(story) if story_ids.insert(story.id.clone()) => stories.push(story),
            Ok(story) => tracing::warn!("skipping duplicate story {}", story.id),
            Err(err) => tracing::warn!("skipping story #{}: {}", index, err),
        }
    }

    let mut votes: Vec<Vote> = Vec::with_capacity(record.votes.len());
    for (index, value) in record.votes.into_iter().enumerate() {
        let vote = serde_json::from_value::<VoteRecord>(value)
            .map_err(anyhow::Error::from)
            .and_then(|record| record.into_vote(now).map_err(anyhow::Error::from));
        match vote {
            Ok(vote) if votes.iter().any(|seen| seen.key() == vote.key()) => {
                tracing::warn!(
                    "skipping repeated vote of {} on story {}",
                    vote.voter,
                    vote.story_id
                )
            }
            Ok(vote) => votes.push(vote),
            Err(err) => tracing::warn!("skipping vote #{}: {}", index, err),
        }
    }

    Ok(GameSnapshot { stories, votes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::story::StoryStatus;

    #[test]
    fn parses_legacy_export() {
        let content = r#"{
            "stories": [
                { "id": 1, "author": "Alice", "title": "A", "story": "a", "isReal": true },
                {
                    "id": "2", "author": "Bob", "title": "B", "body": "b",
                    "isReal": false, "status": "pending"
                },
                { "id": 3, "author": "", "title": "C", "story": "c", "isReal": false }
            ],
            "votes": [
                { "voter": "Carol", "storyId": 1, "guessedAuthor": "Bob", "guessedReal": true },
                {
                    "voter": "Carol", "story_id": "1",
                    "guessed_author": "Alice", "guessed_real": true
                },
                { "voter": "Dave", "storyId": 1, "guessedAuthor": "Alice" }
            ]
        }"#;

        let snapshot = parse(content).unwrap();

        assert_eq!(snapshot.stories.len(), 2);
        assert_eq!(snapshot.stories[0].status, StoryStatus::Approved);
        assert_eq!(snapshot.stories[1].status, StoryStatus::Pending);

        assert_eq!(snapshot.votes.len(), 1);
        assert_eq!(snapshot.votes[0].guessed_author.as_ref(), "Bob");
    }

    #[test]
    fn empty_object_is_an_empty_snapshot() {
        let snapshot = parse("{}").unwrap();
        assert!(snapshot.stories.is_empty());
        assert!(snapshot.votes.is_empty());
    }
}
