use crate::domain::{INSUFFICIENT_INFORMATION_SENTINEL, NO_ABBREVIATIONS_SENTINEL};

/// True when a QA reply carries the insufficient-information phrase anywhere
/// (case-insensitive).
pub fn is_insufficient_information(text: &str) -> bool {
    text.to_lowercase()
        .contains(&INSUFFICIENT_INFORMATION_SENTINEL.to_lowercase())
}

/// True when an abbreviation reply is the bare no-abbreviations marker.
///
/// Models often wrap the marker in quotes, backticks or a trailing period.
pub fn is_no_abbreviations(text: &str) -> bool {
    let t = text
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '`' || c == '.')
        .trim();
    t.eq_ignore_ascii_case(NO_ABBREVIATIONS_SENTINEL)
}

/// Either sentinel, used on the chat path where the backend may answer with
/// whichever marker it saw last.
pub fn is_any_sentinel(text: &str) -> bool {
    is_no_abbreviations(text) || is_insufficient_information(text)
}
