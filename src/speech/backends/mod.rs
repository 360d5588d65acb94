//! Speech engine backends

// Mimic 3 neural TTS via its command line tool
pub mod mimic3;

// espeak-ng fallback
pub mod espeak;

pub use espeak::EspeakEngine;
pub use mimic3::Mimic3Engine;
