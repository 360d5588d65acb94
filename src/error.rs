//! Error types for stenospeak

use std::io;
use thiserror::Error;

/// Main error type for stenospeak
#[derive(Error, Debug)]
pub enum StenoError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("INI parse error: {0}")]
    IniParse(String),

    #[error("Steno dictionary error: {0}")]
    Mapping(String),

    #[error("Sentence script error: {0}")]
    Script(String),

    #[error("Speech engine error: {0}")]
    Speech(String),

    /// Synthesis failed; `wav` still holds a structurally valid WAV
    #[error("Speech synthesis error: {message}")]
    Synthesis { message: String, wav: Vec<u8> },

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for stenospeak operations
pub type Result<T> = std::result::Result<T, StenoError>;

impl From<String> for StenoError {
    fn from(s: String) -> Self {
        StenoError::Other(s)
    }
}

impl From<&str> for StenoError {
    fn from(s: &str) -> Self {
        StenoError::Other(s.to_string())
    }
}
