use super::error::TraceError;

pub const ALPHABET_GRID_URL: &str = "/alphabetgrid";
// Delay between tapping a grid letter and leaving the page
pub const GRID_NAVIGATE_DELAY_MS: u32 = 300;

// Position of the letter in "/<page>/<letter>/"
const LETTER_SEGMENT: usize = 2;

/// Reads the active letter from a page path such as `/letter_trace/a/`.
/// The result is always uppercase.
pub fn letter_from_path(path: &str) -> Result<char, TraceError> {
    let segment = match path.split('/').nth(LETTER_SEGMENT) {
        Some(segment) if !segment.is_empty() => segment,
        _ => return Err(TraceError::MissingLetter(path.to_string())),
    };
    parse_letter(segment)
}

/// A single ASCII letter, uppercased.
pub fn parse_letter(name: &str) -> Result<char, TraceError> {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Ok(c.to_ascii_uppercase()),
        _ => Err(TraceError::InvalidLetter(name.to_string())),
    }
}

pub fn letter_page_url(letter: char) -> String {
    format!("/letter/{}", letter.to_ascii_uppercase())
}

pub fn trace_page_url(letter: char) -> String {
    format!("/letter_trace/{}/", letter.to_ascii_uppercase())
}

/// Letters shown on the alphabet grid, in order.
pub fn alphabet() -> Vec<char> {
    ('A'..='Z').collect()
}
