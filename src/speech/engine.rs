//! Speech engine abstraction
//!
//! An engine turns a [`SynthesisRequest`] into a stream of raw PCM chunks.
//! Every per-call parameter travels in the request, so an engine never holds
//! voice or scale state between calls.

use super::backends::{EspeakEngine, Mimic3Engine};
use crate::{Result, StenoError};
use log::info;
use std::str::FromStr;

/// Session-wide voice defaults
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceSettings {
    /// Voice key, e.g. `en_UK/apope_low`
    pub voice: String,
    /// Speaker for multi-speaker voices
    pub speaker: Option<String>,
    /// Speaking rate; 1.0 is normal, lower is slower
    pub rate: f32,
    pub length_scale: Option<f32>,
    pub noise_scale: Option<f32>,
    pub noise_w: Option<f32>,
    /// Voices to load when the session starts
    pub preload: Vec<String>,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            voice: "en_UK/apope_low".to_string(),
            speaker: None,
            rate: 0.6,
            length_scale: None,
            noise_scale: None,
            noise_w: None,
            preload: Vec::new(),
        }
    }
}

/// Per-call adjustments on top of [`VoiceSettings`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Overrides {
    pub length_scale: Option<f32>,
    pub noise_scale: Option<f32>,
    pub noise_w: Option<f32>,
}

/// Everything an engine needs for one synthesis call
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub text: String,
    pub ssml: bool,
    pub voice: String,
    pub speaker: Option<String>,
    pub length_scale: Option<f32>,
    pub noise_scale: Option<f32>,
    pub noise_w: Option<f32>,
}

impl SynthesisRequest {
    /// Resolve overrides against the session defaults
    ///
    /// SSML carries its own `<prosody rate>`, so the session rate only turns
    /// into a length scale (`1 / rate`) for plain text without an explicit one.
    pub fn new(text: &str, ssml: bool, settings: &VoiceSettings, overrides: &Overrides) -> Self {
        let rate_scale = (!ssml && settings.rate > 0.0 && settings.rate != 1.0)
            .then(|| 1.0 / settings.rate);

        Self {
            text: text.to_string(),
            ssml,
            voice: settings.voice.clone(),
            speaker: settings.speaker.clone(),
            length_scale: overrides
                .length_scale
                .or(settings.length_scale)
                .or(rate_scale),
            noise_scale: overrides.noise_scale.or(settings.noise_scale),
            noise_w: overrides.noise_w.or(settings.noise_w),
        }
    }
}

/// One block of synthesized audio
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioResult {
    pub sample_rate_hz: u32,
    pub sample_width_bytes: u16,
    pub num_channels: u16,
    /// Interleaved little-endian PCM; 8-bit audio is unsigned
    pub audio_bytes: Vec<u8>,
}

/// Audio chunks in the order the engine produced them
pub type AudioResults<'a> = Box<dyn Iterator<Item = Result<AudioResult>> + 'a>;

/// Speech engine trait
///
/// Backends wrap an external synthesizer. Errors before the first chunk are
/// returned from `speak`; errors mid-stream come through the iterator.
pub trait SpeechEngine: Send {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Make sure a voice is available before the first request
    fn preload_voice(&mut self, voice: &str) -> Result<()>;

    /// Synthesize text or SSML
    fn speak(&mut self, request: &SynthesisRequest) -> Result<AudioResults<'_>>;
}

/// Engine selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    /// Mimic 3, falling back to espeak-ng
    Auto,
    Mimic3,
    Espeak,
}

impl FromStr for EngineKind {
    type Err = StenoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "auto" => Ok(Self::Auto),
            "mimic3" => Ok(Self::Mimic3),
            "espeak" | "espeak-ng" => Ok(Self::Espeak),
            other => Err(StenoError::Config(format!(
                "Unknown speech engine '{}' (expected auto, mimic3 or espeak)",
                other
            ))),
        }
    }
}

/// Create a speech engine
///
/// `Auto` tries Mimic 3 first since it understands the voice keys and noise
/// parameters, then espeak-ng.
pub fn create_engine(kind: EngineKind) -> Result<Box<dyn SpeechEngine>> {
    match kind {
        EngineKind::Mimic3 => Ok(Box::new(Mimic3Engine::new()?)),
        EngineKind::Espeak => Ok(Box::new(EspeakEngine::new()?)),
        EngineKind::Auto => {
            info!("Trying Mimic 3 engine...");
            match Mimic3Engine::new() {
                Ok(engine) => {
                    info!("✓ Using Mimic 3 engine");
                    return Ok(Box::new(engine));
                }
                Err(e) => info!("✗ Mimic 3 unavailable: {}", e),
            }

            info!("Trying espeak-ng engine...");
            match EspeakEngine::new() {
                Ok(engine) => {
                    info!("✓ Using espeak-ng engine");
                    Ok(Box::new(engine))
                }
                Err(e) => Err(StenoError::Speech(format!(
                    "No speech engine available. Tried:\n\
                     1. Mimic 3 (install: pip install mycroft-mimic3-tts)\n\
                     2. espeak-ng (install: sudo apt install espeak-ng)\n\
                     Error: {}",
                    e
                ))),
            }
        }
    }
}
