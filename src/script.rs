//! Sentence script loading
//!
//! A script is a plain text file. The first line is the pause, in seconds,
//! inserted between words; every following line is one sentence.

use crate::{Result, StenoError};
use log::debug;
use std::fs;
use std::path::Path;

/// Parsed sentence script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceScript {
    /// Seconds per inter-word break, kept verbatim for the SSML template
    pub pause: String,
    pub sentences: Vec<String>,
}

impl SentenceScript {
    /// Parse script text; every line is trimmed
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().map(str::trim);
        let pause = lines
            .next()
            .ok_or_else(|| StenoError::Script("script is empty, expected a pause on line 1".into()))?
            .to_string();
        let sentences: Vec<String> = lines.map(str::to_string).collect();

        debug!("Script: pause {:?}s, {} sentences", pause, sentences.len());
        Ok(Self { pause, sentences })
    }

    /// Read and parse a script file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            StenoError::Script(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&text)
    }
}
