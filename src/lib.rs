//! stenospeak - steno dictionary indexer and SSML sentence reader
//!
//! Finds stenography strokes that are spelled like the word they write, and
//! reads sentence scripts aloud with timed pauses between words.

pub mod app;
pub mod audio;
pub mod config;
pub mod error;
pub mod script;
pub mod speech;
pub mod ssml;
pub mod steno;

pub use error::{Result, StenoError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "stenospeak";
