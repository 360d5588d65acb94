//! Speech synthesis system

pub mod backends;
pub mod engine;
pub mod session;

pub use engine::{
    create_engine, AudioResult, AudioResults, EngineKind, Overrides, SpeechEngine,
    SynthesisRequest, VoiceSettings,
};
pub use session::{SynthesisPhase, TtsSession};
