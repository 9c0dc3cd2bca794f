use std::collections::HashMap;

use hallostories_common::ParticipantName;
use hallostories_common::story::{Story, StoryId};
use hallostories_common::vote::Vote;
use itertools::Itertools;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub voter: ParticipantName,
    pub author_correct: u32,
    pub real_fake_correct: u32,
    pub points: u32,
    pub max_points: u32,
    pub total_votes: u32,
    pub percentage: u32,
}

/// The truth behind a story, shown once the game is over.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealedStory {
    pub id: StoryId,
    pub title: String,
    pub author: ParticipantName,
    pub is_real: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub stories: usize,
    pub voters: usize,
    pub votes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboard {
    pub entries: Vec<Score>,
    pub reveal: Vec<RevealedStory>,
    pub stats: GameStats,
}

#[derive(Default)]
struct Tally {
    author_correct: u32,
    real_fake_correct: u32,
    total_votes: u32,
}

impl Tally {
    fn record(&mut self, vote: &Vote, story: &Story) {
        self.total_votes += 1;
        if vote.guessed_author == story.author {
            self.author_correct += 1;
        }
        if vote.guessed_real == story.is_real {
            self.real_fake_correct += 1;
        }
    }

    fn into_score(self, voter: ParticipantName) -> Score {
        let points = self.author_correct + self.real_fake_correct;
        let max_points = self.total_votes * 2;
        let percentage = (points as f64 / max_points as f64 * 100.0).round() as u32;
        Score {
            voter,
            author_correct: self.author_correct,
            real_fake_correct: self.real_fake_correct,
            points,
            max_points,
            total_votes: self.total_votes,
            percentage,
        }
    }
}

/// Scores every voter against the approved stories.
///
/// Votes referring to a story that is not in `stories` (or not approved) are
/// skipped. Ties on points and percentage keep ledger order.
pub fn score(stories: &[Story], votes: &[Vote]) -> Leaderboard {
    let approved = stories
        .iter()
        .filter(|story| story.is_eligible())
        .collect::<Vec<_>>();
    let by_id = approved
        .iter()
        .map(|story| (story.id.as_str(), *story))
        .collect::<HashMap<_, _>>();

    let mut order: Vec<&ParticipantName> = Vec::new();
    let mut tallies: HashMap<&ParticipantName, Tally> = HashMap::new();
    for vote in votes {
        let tally = tallies.entry(&vote.voter).or_insert_with(|| {
            order.push(&vote.voter);
            Tally::default()
        });
        if let Some(story) = by_id.get(vote.story_id.as_str()) {
            tally.record(vote, story);
        }
    }

    let mut entries = order
        .into_iter()
        .filter_map(|voter| {
            let tally = tallies.remove(voter)?;
            (tally.total_votes > 0).then(|| tally.into_score(voter.clone()))
        })
        .collect::<Vec<_>>();
    entries.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| b.percentage.cmp(&a.percentage))
    });

    let reveal = approved
        .iter()
        .map(|story| RevealedStory {
            id: story.id.clone(),
            title: story.title.to_string(),
            author: story.author.clone(),
            is_real: story.is_real,
        })
        .collect::<Vec<_>>();

    let stats = GameStats {
        stories: approved.len(),
        voters: votes.iter().map(|vote| &vote.voter).unique().count(),
        votes: votes.len(),
    };

    Leaderboard {
        entries,
        reveal,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hallostories_common::test_utils::{approved_story, pending_story, vote};
    use proptest::prelude::*;

    fn stories() -> Vec<Story> {
        vec![
            approved_story("a", "Alice", true),
            approved_story("b", "Bob", false),
        ]
    }

    #[test]
    fn carol_scores_three_of_four() {
        let votes = vec![vote("Carol", "a", "Bob", true), vote("Carol", "b", "Bob", false)];

        let leaderboard = score(&stories(), &votes);

        assert_eq!(leaderboard.entries.len(), 1);
        let carol = &leaderboard.entries[0];
        assert_eq!(carol.voter.as_ref(), "Carol");
        assert_eq!(carol.author_correct, 1);
        assert_eq!(carol.real_fake_correct, 2);
        assert_eq!(carol.points, 3);
        assert_eq!(carol.max_points, 4);
        assert_eq!(carol.percentage, 75);
    }

    #[test]
    fn unresolved_votes_are_skipped() {
        let mut stories = stories();
        stories.push(pending_story("c", "Carol", true));
        let votes = vec![
            vote("Dave", "zz", "Alice", true),
            vote("Dave", "c", "Carol", true),
            vote("Erin", "a", "Alice", true),
            vote("Erin", "zz", "Bob", false),
        ];

        let leaderboard = score(&stories, &votes);

        assert_eq!(leaderboard.entries.len(), 1);
        assert_eq!(leaderboard.entries[0].voter.as_ref(), "Erin");
        assert_eq!(leaderboard.entries[0].total_votes, 1);
        assert_eq!(leaderboard.entries[0].percentage, 100);
        assert_eq!(leaderboard.stats.voters, 2);
        assert_eq!(leaderboard.stats.votes, 4);
        assert_eq!(leaderboard.stats.stories, 2);
    }

    #[test]
    fn author_match_is_case_sensitive() {
        let votes = vec![vote("Carol", "a", "alice", false)];

        let leaderboard = score(&stories(), &votes);

        assert_eq!(leaderboard.entries[0].points, 0);
        assert_eq!(leaderboard.entries[0].percentage, 0);
    }

    #[test]
    fn ties_keep_ledger_order() {
        let votes = vec![
            vote("Zoe", "a", "Alice", false),
            vote("Carol", "a", "Bob", true),
            vote("Bob", "a", "Alice", true),
        ];

        let leaderboard = score(&stories(), &votes);

        let order = leaderboard
            .entries
            .iter()
            .map(|s| s.voter.as_ref())
            .collect::<Vec<&str>>();
        assert_eq!(order, vec!["Bob", "Zoe", "Carol"]);
    }

    #[test]
    fn reveal_lists_approved_stories_in_order() {
        let mut stories = stories();
        stories.insert(1, pending_story("p", "Paul", true));

        let leaderboard = score(&stories, &[]);

        assert!(leaderboard.entries.is_empty());
        let ids = leaderboard
            .reveal
            .iter()
            .map(|s| s.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(leaderboard.reveal[1].author.as_ref(), "Bob");
        assert!(!leaderboard.reveal[1].is_real);
    }

    proptest! {
        #[test]
        fn points_never_exceed_max(
            guesses in proptest::collection::vec(
                (0usize..4, 0usize..3, 0usize..3, any::<bool>()),
                0..30,
            )
        ) {
            let voters = ["Alice", "Bob", "Carol", "Dave"];
            let authors = ["Alice", "Bob", "Carol"];
            let ids = ["a", "b", "zz"];
            let votes = guesses
                .into_iter()
                .map(|(voter, story, author, real)| {
                    vote(voters[voter], ids[story], authors[author], real)
                })
                .collect::<Vec<_>>();

            let leaderboard = score(&stories(), &votes);

            for entry in leaderboard.entries {
                prop_assert!(entry.total_votes > 0);
                prop_assert!(entry.points <= entry.max_points);
                prop_assert_eq!(entry.max_points, entry.total_votes * 2);
                prop_assert!(entry.percentage <= 100);
            }
        }
    }
}
