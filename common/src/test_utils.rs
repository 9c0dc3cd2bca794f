use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::domain::story::{NewStory, Story, StoryId, StoryStatus};
use crate::domain::vote::Vote;
use crate::domain::{ParticipantName, StoryBody, StoryTitle};

/// Fixed clock so that ordering assertions do not depend on wall time.
///
/// Public so that other crates can reuse it for their own tests.
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 31, 20, 0, 0)
        .single()
        .expect("valid fixture date")
        + Duration::minutes(minutes)
}

pub fn name(value: &str) -> ParticipantName {
    ParticipantName::try_new(value).expect("valid participant name")
}

pub fn new_story(author: &str, is_real: bool) -> NewStory {
    NewStory {
        author: name(author),
        title: StoryTitle::try_new(format!("A tale by {}", author)).expect("valid title"),
        body: StoryBody::try_new("It happened on a dark and stormy night.").expect("valid body"),
        is_real,
    }
}

pub fn pending_story(id: &str, author: &str, is_real: bool) -> Story {
    Story::new(StoryId::from(id), new_story(author, is_real), at(0))
}

/// Convenience for the common case of a story already open for voting.
pub fn approved_story(id: &str, author: &str, is_real: bool) -> Story {
    let mut story = pending_story(id, author, is_real);
    story.status = StoryStatus::Approved;
    story
}

pub fn rejected_story(id: &str, author: &str, is_real: bool) -> Story {
    let mut story = pending_story(id, author, is_real);
    story.status = StoryStatus::Rejected;
    story
}

pub fn vote(voter: &str, story_id: &str, guessed_author: &str, guessed_real: bool) -> Vote {
    Vote {
        voter: name(voter),
        story_id: StoryId::from(story_id),
        guessed_author: name(guessed_author),
        guessed_real,
        timestamp: at(1),
    }
}
