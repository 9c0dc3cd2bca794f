use std::sync::LazyLock;
use nutype::nutype;
use regex::Regex;

pub mod story;
pub mod vote;

// Free text typed by players: anything printable, no control characters.
// Example: "Émilie B." or "Le 13 octobre..." are valid; "tab\there" is not.
pub const PRINTABLE_TEXT_REGEX: &str = r"^[^\p{Cc}]+$";

// Bodies may span several paragraphs, so line breaks are allowed there.
pub const MULTILINE_TEXT_REGEX: &str = r"^[^\p{Cc}]*(?:[\r\n\t]+[^\p{Cc}]*)*$";

static PRINTABLE_TEXT_REGEX_COMPILED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(PRINTABLE_TEXT_REGEX).expect("PRINTABLE_TEXT_REGEX must be a valid regex")
});

static MULTILINE_TEXT_REGEX_COMPILED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(MULTILINE_TEXT_REGEX).expect("MULTILINE_TEXT_REGEX must be a valid regex")
});

pub fn is_printable(text: &str) -> bool {
    PRINTABLE_TEXT_REGEX_COMPILED.is_match(text)
}

pub fn is_multiline_printable(text: &str) -> bool {
    MULTILINE_TEXT_REGEX_COMPILED.is_match(text)
}

/// Display name of a player, used both as story author and as voter.
/// Names are compared exactly (case-sensitive) once trimmed.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 50, predicate = is_printable),
    derive(
        Clone,
        Debug,
        Display,
        AsRef,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize
    )
)]
pub struct ParticipantName(String);

#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 100, predicate = is_printable),
    derive(Clone, Debug, Display, AsRef, PartialEq, Eq, Serialize, Deserialize)
)]
pub struct StoryTitle(String);

#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 10000, predicate = is_multiline_printable),
    derive(Clone, Debug, AsRef, PartialEq, Eq, Serialize, Deserialize)
)]
pub struct StoryBody(String);
