use thiserror::Error;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("No letter in page path: {0}")]
    MissingLetter(String),

    #[error("Not a traceable letter: {0:?}")]
    InvalidLetter(String),

    #[error("No glyph for letter {0:?}")]
    UnknownGlyph(char),

    #[error("Invalid trace config: {0}")]
    InvalidConfig(#[source] serde_json::Error),

    #[error("Invalid reader data: {0}")]
    InvalidReaderData(#[source] serde_json::Error),

    #[error("Invalid stroke data: {0}")]
    InvalidStrokes(#[source] serde_json::Error),
}
