use std::collections::HashSet;

use chrono::{DateTime, Utc};
use hallostories_common::ParticipantName;
use hallostories_common::story::{Story, StoryId};
use hallostories_common::vote::Vote;
use thiserror::Error;

/// A vote as submitted by a player, before the eligibility rule has run.
/// Guesses are optional so that an unfinished selection can be reported.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteCandidate {
    pub voter: ParticipantName,
    pub story_id: StoryId,
    pub guessed_author: Option<ParticipantName>,
    pub guessed_real: Option<bool>,
}

impl VoteCandidate {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.guessed_author.is_none() {
            missing.push("guessedAuthor");
        }
        if self.guessed_real.is_none() {
            missing.push("guessedReal");
        }
        missing
    }

    /// Turns a complete candidate into a ledger record stamped with `timestamp`.
    pub fn into_vote(self, timestamp: DateTime<Utc>) -> Result<Vote, VoteError> {
        let missing = self.missing_fields();
        match (self.guessed_author, self.guessed_real) {
            (Some(guessed_author), Some(guessed_real)) => Ok(Vote {
                voter: self.voter,
                story_id: self.story_id,
                guessed_author,
                guessed_real,
                timestamp,
            }),
            _ => Err(VoteError::IncompleteSelection(missing)),
        }
    }
}

/// Why a vote was refused. None of these leave any trace in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoteError {
    #[error("You've already voted on this story! Votes cannot be changed.")]
    AlreadyVoted,
    #[error("Please complete your selection (missing: {})", .0.join(", "))]
    IncompleteSelection(Vec<&'static str>),
    #[error("This story is not open for voting.")]
    StoryNotEligible,
}

/// Decides whether `candidate` may be appended to `ledger`.
///
/// Checks run in a fixed order: a repeated `(voter, story)` pair wins over an
/// incomplete selection, which wins over an ineligible story.
pub fn check_eligibility(
    ledger: &VoteLedger,
    stories: &[Story],
    candidate: &VoteCandidate,
) -> Result<(), VoteError> {
    if ledger.contains(&candidate.voter, &candidate.story_id) {
        return Err(VoteError::AlreadyVoted);
    }

    let missing = candidate.missing_fields();
    if !missing.is_empty() {
        return Err(VoteError::IncompleteSelection(missing));
    }

    let eligible = stories
        .iter()
        .any(|story| story.id == candidate.story_id && story.is_eligible());
    if !eligible {
        return Err(VoteError::StoryNotEligible);
    }

    Ok(())
}

/// Append-only collection of votes, at most one per `(voter, story)` pair.
///
/// There is no way to edit or remove a single vote; [`VoteLedger::clear`]
/// exists only for a full game reset.
#[derive(Debug, Clone, Default)]
pub struct VoteLedger {
    votes: Vec<Vote>,
    keys: HashSet<(ParticipantName, StoryId)>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    pub fn contains(&self, voter: &ParticipantName, story_id: &StoryId) -> bool {
        self.keys.contains(&(voter.clone(), story_id.clone()))
    }

    /// Runs the eligibility rule and, on success, appends the vote and
    /// returns a copy of the stored record.
    pub fn append(
        &mut self,
        stories: &[Story],
        candidate: VoteCandidate,
        timestamp: DateTime<Utc>,
    ) -> Result<Vote, VoteError> {
        check_eligibility(self, stories, &candidate)?;

        let vote = candidate.into_vote(timestamp)?;
        if !self.keys.insert((vote.voter.clone(), vote.story_id.clone())) {
            return Err(VoteError::AlreadyVoted);
        }
        self.votes.push(vote.clone());

        Ok(vote)
    }

    pub fn clear(&mut self) {
        self.votes.clear();
        self.keys.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hallostories_common::test_utils::{
        approved_story, at, name, pending_story, rejected_story,
    };
    use proptest::prelude::*;

    fn candidate(
        voter: &str,
        story_id: &str,
        author: Option<&str>,
        real: Option<bool>,
    ) -> VoteCandidate {
        VoteCandidate {
            voter: name(voter),
            story_id: StoryId::from(story_id),
            guessed_author: author.map(name),
            guessed_real: real,
        }
    }

    fn stories() -> Vec<Story> {
        vec![
            approved_story("a", "Alice", true),
            approved_story("b", "Bob", false),
            pending_story("c", "Carol", true),
            rejected_story("r", "Rita", false),
        ]
    }

    #[test]
    fn accepts_complete_vote_on_approved_story() {
        let mut ledger = VoteLedger::new();
        let vote = ledger
            .append(&stories(), candidate("Carol", "a", Some("Bob"), Some(true)), at(5))
            .unwrap();

        assert_eq!(vote.voter, name("Carol"));
        assert_eq!(vote.timestamp, at(5));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn second_vote_on_same_story_is_rejected() {
        let stories = stories();
        let mut ledger = VoteLedger::new();
        ledger
            .append(&stories, candidate("Carol", "a", Some("Bob"), Some(true)), at(1))
            .unwrap();
        ledger
            .append(&stories, candidate("Carol", "b", Some("Bob"), Some(false)), at(2))
            .unwrap();

        let second = ledger.append(
            &stories,
            candidate("Carol", "a", Some("Alice"), Some(false)),
            at(3),
        );

        assert_eq!(second, Err(VoteError::AlreadyVoted));
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.votes()[0].guessed_author, name("Bob"));
    }

    #[test]
    fn incomplete_selection_names_missing_fields() {
        let mut ledger = VoteLedger::new();

        let result = ledger.append(&stories(), candidate("Carol", "a", None, None), at(1));

        assert_eq!(
            result,
            Err(VoteError::IncompleteSelection(vec!["guessedAuthor", "guessedReal"]))
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn only_approved_stories_are_eligible() {
        let stories = stories();
        let mut ledger = VoteLedger::new();

        for story_id in ["c", "r", "zz"] {
            let result = ledger.append(
                &stories,
                candidate("Dave", story_id, Some("Carol"), Some(true)),
                at(1),
            );
            assert_eq!(result, Err(VoteError::StoryNotEligible), "story {}", story_id);
        }
        assert!(ledger.is_empty());
    }

    #[test]
    fn already_voted_is_reported_before_incomplete_selection() {
        let stories = stories();
        let mut ledger = VoteLedger::new();
        ledger
            .append(&stories, candidate("Carol", "a", Some("Bob"), Some(true)), at(1))
            .unwrap();

        let repeated = candidate("Carol", "a", None, Some(true));
        let result = check_eligibility(&ledger, &stories, &repeated);

        assert_eq!(result, Err(VoteError::AlreadyVoted));
    }

    #[test]
    fn self_vote_is_allowed() {
        let mut ledger = VoteLedger::new();
        let own = candidate("Alice", "a", Some("Alice"), Some(true));
        let result = ledger.append(&stories(), own, at(1));
        assert!(result.is_ok());
    }

    #[test]
    fn clear_empties_the_ledger() {
        let stories = stories();
        let mut ledger = VoteLedger::new();
        ledger
            .append(&stories, candidate("Carol", "a", Some("Bob"), Some(true)), at(1))
            .unwrap();

        ledger.clear();

        assert!(ledger.is_empty());
        assert!(!ledger.contains(&name("Carol"), &StoryId::from("a")));
    }

    fn submission_strategy() -> impl Strategy<Value = VoteCandidate> {
        let voter = prop_oneof![Just("Alice"), Just("Bob"), Just("Carol")];
        let story = prop_oneof![Just("a"), Just("b"), Just("c"), Just("r")];
        let author = proptest::option::of(prop_oneof![Just("Alice"), Just("Bob")]);
        (voter, story, author, proptest::option::of(any::<bool>()))
            .prop_map(|(voter, story, author, real)| candidate(voter, story, author, real))
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

        #[test]
        fn at_most_one_vote_per_voter_and_story(
            submissions in proptest::collection::vec(submission_strategy(), 0..40)
        ) {
            let stories = stories();
            let mut ledger = VoteLedger::new();
            for submission in submissions {
                let _ = ledger.append(&stories, submission, at(0));
            }

            let mut seen = HashSet::new();
            for vote in ledger.votes() {
                prop_assert!(seen.insert((vote.voter.clone(), vote.story_id.clone())));
                prop_assert!(
                    stories
                        .iter()
                        .any(|story| story.id == vote.story_id && story.is_eligible())
                );
            }
        }
    }
}
