mod domain;
mod infrastructure;

pub mod test_utils;

// Persisted table and field names

pub const STORIES_TABLE_NAME: &'static str = "stories";
pub const VOTES_TABLE_NAME: &'static str = "votes";

pub const ID_FIELD_NAME: &'static str = "id";
pub const POSITION_FIELD_NAME: &'static str = "position";
pub const STATUS_FIELD_NAME: &'static str = "status";
pub const SUBMITTED_FIELD_NAME: &'static str = "submitted_at";
pub const MODERATED_FIELD_NAME: &'static str = "moderated_at";

pub const VOTER_FIELD_NAME: &'static str = "voter";
pub const STORY_ID_FIELD_NAME: &'static str = "story_id";
pub const CREATED_FIELD_NAME: &'static str = "created_at";

// expose domain module

pub use domain::*;
pub use infrastructure::records;
pub use infrastructure::snapshot::{self, GameSnapshot};

// expose database module

pub use infrastructure::database;
