//! Steno dictionary loading

use crate::{Result, StenoError};
use log::{debug, info};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Which side of the JSON object holds the written word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MappingOrientation {
    /// `{"cat": "KAT"}`
    #[default]
    WordToStroke,
    /// `{"KAT": "cat"}`, the layout Plover dictionaries use
    StrokeToWord,
}

impl FromStr for MappingOrientation {
    type Err = StenoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "word_to_stroke" => Ok(Self::WordToStroke),
            "stroke_to_word" | "plover" => Ok(Self::StrokeToWord),
            other => Err(StenoError::Config(format!(
                "Unknown dictionary orientation '{}' (expected word_to_stroke or stroke_to_word)",
                other
            ))),
        }
    }
}

/// Read-only word/stroke dictionary
#[derive(Debug, Clone, Default)]
pub struct StenoDictionary {
    entries: BTreeMap<String, String>,
    orientation: MappingOrientation,
}

impl StenoDictionary {
    /// Wrap an already-decoded JSON object
    pub fn from_map(entries: BTreeMap<String, String>, orientation: MappingOrientation) -> Self {
        Self {
            entries,
            orientation,
        }
    }

    /// Parse a JSON object of string to string
    pub fn from_json_str(json: &str, orientation: MappingOrientation) -> Result<Self> {
        let entries: BTreeMap<String, String> = serde_json::from_str(json)
            .map_err(|e| StenoError::Mapping(format!("Malformed dictionary: {}", e)))?;
        Ok(Self::from_map(entries, orientation))
    }

    /// Load the dictionary file
    pub fn load<P: AsRef<Path>>(path: P, orientation: MappingOrientation) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading steno dictionary from {:?} ({:?})", path, orientation);

        let json = fs::read_to_string(path).map_err(|e| {
            StenoError::Mapping(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let dictionary = Self::from_json_str(&json, orientation).map_err(|e| match e {
            StenoError::Mapping(msg) => {
                StenoError::Mapping(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;

        info!("Loaded {} dictionary entries", dictionary.len());
        Ok(dictionary)
    }

    /// Iterate `(word, stroke)` pairs
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        let orientation = self.orientation;
        self.entries.iter().map(move |(k, v)| match orientation {
            MappingOrientation::WordToStroke => (k.as_str(), v.as_str()),
            MappingOrientation::StrokeToWord => (v.as_str(), k.as_str()),
        })
    }

    /// Is `word` written by some entry?
    pub fn contains_word(&self, word: &str) -> bool {
        match self.orientation {
            MappingOrientation::WordToStroke => self.entries.contains_key(word),
            MappingOrientation::StrokeToWord => self.entries.values().any(|w| w == word),
        }
    }

    pub fn orientation(&self) -> MappingOrientation {
        self.orientation
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_parse() {
        assert_eq!(
            "word_to_stroke".parse::<MappingOrientation>().unwrap(),
            MappingOrientation::WordToStroke
        );
        assert_eq!(
            "plover".parse::<MappingOrientation>().unwrap(),
            MappingOrientation::StrokeToWord
        );
        assert!("".parse::<MappingOrientation>().is_err());
    }

    #[test]
    fn test_pairs_follow_orientation() {
        let json = r#"{"cat": "KAT"}"#;

        let dict = StenoDictionary::from_json_str(json, MappingOrientation::WordToStroke).unwrap();
        assert_eq!(dict.pairs().collect::<Vec<_>>(), vec![("cat", "KAT")]);
        assert!(dict.contains_word("cat"));

        let dict = StenoDictionary::from_json_str(json, MappingOrientation::StrokeToWord).unwrap();
        assert_eq!(dict.pairs().collect::<Vec<_>>(), vec![("KAT", "cat")]);
        assert!(dict.contains_word("KAT"));
        assert!(!dict.contains_word("cat"));
    }

    #[test]
    fn test_non_string_values_rejected() {
        let result = StenoDictionary::from_json_str(r#"{"cat": 1}"#, Default::default());
        assert!(matches!(result, Err(StenoError::Mapping(_))));

        let result = StenoDictionary::from_json_str("[]", Default::default());
        assert!(matches!(result, Err(StenoError::Mapping(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = StenoDictionary::load("/nonexistent/stened.json", Default::default());
        assert!(matches!(result, Err(StenoError::Mapping(_))));
    }
}
