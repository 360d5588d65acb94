//! Stenography dictionary indexing
//!
//! Loads a word/stroke dictionary, inverts it into a stroke-keyed index and
//! picks out strokes that are spelled almost like the word they write.

pub mod dictionary;
pub mod index;

pub use dictionary::{MappingOrientation, StenoDictionary};
pub use index::{classify_simple_pairs, is_simple, normalize, ReverseIndex, SimplePair};
