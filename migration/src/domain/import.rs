use std::collections::HashSet;

use hallostories_common::GameSnapshot;
use hallostories_common::story::{Story, StoryId};
use hallostories_common::vote::Vote;

/// What a legacy snapshot contributes to the database.
#[derive(Debug, Default)]
pub struct ImportPlan {
    pub stories: Vec<Story>,
    pub votes: Vec<Vote>,
    pub skipped_votes: usize,
}

/// Keeps every story and only the votes that could have been cast: votes on
/// stories missing from the snapshot or not approved are dropped.
pub fn plan_import(snapshot: GameSnapshot) -> ImportPlan {
    let votable = snapshot
        .stories
        .iter()
        .filter(|story| story.is_eligible())
        .map(|story| story.id.clone())
        .collect::<HashSet<StoryId>>();

    let total_votes = snapshot.votes.len();
    let votes = snapshot
        .votes
        .into_iter()
        .filter(|vote| votable.contains(&vote.story_id))
        .collect::<Vec<_>>();

    ImportPlan {
        skipped_votes: total_votes - votes.len(),
        stories: snapshot.stories,
        votes,
    }
}
