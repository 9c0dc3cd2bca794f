use hallostories_common::ParticipantName;
use hallostories_common::story::Story;
use hallostories_common::vote::Vote;
use itertools::Itertools;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantStatus {
    pub name: ParticipantName,
    pub votes_cast: usize,
    pub complete: bool,
}

/// Who still has to vote. Participants are story authors followed by voters,
/// each listed once in order of first appearance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipationReport {
    pub participants: Vec<ParticipantStatus>,
    pub expected_votes_per_participant: usize,
    pub complete_participants: usize,
    pub total_votes: usize,
    pub expected_votes: usize,
    pub completion_percentage: u32,
    pub all_voted: bool,
    pub message: String,
}

/// Progress of a single voter through the approved stories.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterProgress {
    pub voter: ParticipantName,
    pub votes_cast: usize,
    pub expected_votes: usize,
    pub complete: bool,
    pub message: String,
}

fn votes_by<'a>(votes: &'a [Vote], voter: &'a ParticipantName) -> impl Iterator<Item = &'a Vote> {
    votes.iter().filter(move |vote| &vote.voter == voter)
}

pub fn track(stories: &[Story], votes: &[Vote]) -> ParticipationReport {
    let approved = stories.iter().filter(|story| story.is_eligible());
    let expected_votes_per_participant = approved.clone().count();

    let participants = approved
        .map(|story| &story.author)
        .chain(votes.iter().map(|vote| &vote.voter))
        .unique()
        .map(|name| {
            let votes_cast = votes_by(votes, name).count();
            ParticipantStatus {
                name: name.clone(),
                votes_cast,
                complete: votes_cast == expected_votes_per_participant,
            }
        })
        .collect::<Vec<_>>();

    let complete_participants = participants.iter().filter(|p| p.complete).count();
    let expected_votes = participants.len() * expected_votes_per_participant;

    let all_voted = expected_votes_per_participant > 0
        && !participants.is_empty()
        && complete_participants == participants.len();

    let completion_percentage = if participants.is_empty() {
        0
    } else {
        (complete_participants as f64 / participants.len() as f64 * 100.0).round() as u32
    };

    let message = if expected_votes_per_participant == 0 {
        "No stories yet".to_string()
    } else if all_voted {
        "All players have voted!".to_string()
    } else {
        format!(
            "Waiting for votes... ({}/{} players done)",
            complete_participants,
            participants.len()
        )
    };

    ParticipationReport {
        participants,
        expected_votes_per_participant,
        complete_participants,
        total_votes: votes.len(),
        expected_votes,
        completion_percentage,
        all_voted,
        message,
    }
}

pub fn progress(voter: &ParticipantName, stories: &[Story], votes: &[Vote]) -> VoterProgress {
    let expected_votes = stories.iter().filter(|story| story.is_eligible()).count();
    let votes_cast = votes_by(votes, voter).count();

    VoterProgress {
        voter: voter.clone(),
        votes_cast,
        expected_votes,
        complete: expected_votes > 0 && votes_cast == expected_votes,
        message: format!("{}/{} stories voted", votes_cast, expected_votes),
    }
}
