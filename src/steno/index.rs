//! Reverse index and simple-pair classification

use super::StenoDictionary;
use log::debug;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Stroke -> every word written by that stroke
///
/// Several words can share one stroke, hence the set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReverseIndex {
    strokes: BTreeMap<String, BTreeSet<String>>,
}

impl ReverseIndex {
    /// Invert a dictionary
    pub fn build(dictionary: &StenoDictionary) -> Self {
        let mut strokes: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (word, stroke) in dictionary.pairs() {
            strokes
                .entry(stroke.to_string())
                .or_default()
                .insert(word.to_string());
        }
        debug!(
            "Reverse index: {} strokes from {} entries",
            strokes.len(),
            dictionary.len()
        );
        Self { strokes }
    }

    /// Words written by `stroke`
    pub fn words_for(&self, stroke: &str) -> Option<&BTreeSet<String>> {
        self.strokes.get(stroke)
    }

    /// Iterate strokes in ascending order with their words
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> + '_ {
        self.strokes.iter().map(|(s, w)| (s.as_str(), w))
    }

    /// Number of distinct strokes
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}

/// A stroke spelled almost exactly like the word it writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimplePair {
    pub stroke: String,
    pub word: String,
}

/// Naive spelling normalization: lowercase, `c` -> `k`, then `ll` -> `l`
///
/// Literal substitution, applied in that order.
pub fn normalize(text: &str) -> String {
    text.to_lowercase().replace('c', "k").replace("ll", "l")
}

/// Does `word` normalize to the lowercased `stroke`?
pub fn is_simple(stroke: &str, word: &str) -> bool {
    normalize(word) == stroke.to_lowercase()
}

/// Collect simple pairs, one candidate per stroke
///
/// The written word is the side that gets normalized: a pair is kept when
/// `normalize(word)` equals the lowercased stroke, so `("KAT", "cat")` is
/// kept. Only the lexicographically smallest word of each stroke is examined;
/// the rest of the set is ignored. Output is in ascending stroke order.
pub fn classify_simple_pairs(index: &ReverseIndex) -> Vec<SimplePair> {
    let pairs: Vec<SimplePair> = index
        .iter()
        .filter_map(|(stroke, words)| {
            let word = words.iter().next()?;
            is_simple(stroke, word).then(|| SimplePair {
                stroke: stroke.to_string(),
                word: word.clone(),
            })
        })
        .collect();

    debug!("{} of {} strokes are simple", pairs.len(), index.len());
    pairs
}
