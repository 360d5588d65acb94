//! TTS session
//!
//! Owns one speech engine and one audio player for the life of the process.
//! Each call builds its own [`SynthesisRequest`], so nothing about a call
//! leaks into the next one.

use super::{Overrides, SpeechEngine, SynthesisRequest, VoiceSettings};
use crate::audio::{play_wav_bytes, AudioPlayer, WavAssembler};
use crate::ssml::SsmlDocument;
use crate::{Result, StenoError};
use log::{debug, info, warn};

/// Where a synthesis call currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisPhase {
    Idle,
    /// Resolving overrides into a request
    Configuring,
    /// Streaming chunks from the engine
    Synthesizing,
    /// Finalizing the WAV file
    Encoding,
    Playing,
}

/// Engine + player pair with session-wide voice defaults
pub struct TtsSession {
    engine: Box<dyn SpeechEngine>,
    player: Box<dyn AudioPlayer>,
    settings: VoiceSettings,
    phase: SynthesisPhase,
}

impl TtsSession {
    /// Start a session, preloading the configured voices
    pub fn new(
        mut engine: Box<dyn SpeechEngine>,
        player: Box<dyn AudioPlayer>,
        settings: VoiceSettings,
    ) -> Result<Self> {
        info!(
            "Starting TTS session: engine {}, player {}, voice {}",
            engine.name(),
            player.name(),
            settings.voice
        );
        for voice in &settings.preload {
            engine.preload_voice(voice)?;
        }

        Ok(Self {
            engine,
            player,
            settings,
            phase: SynthesisPhase::Idle,
        })
    }

    pub fn settings(&self) -> &VoiceSettings {
        &self.settings
    }

    pub fn phase(&self) -> SynthesisPhase {
        self.phase
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Synthesize text or SSML into WAV bytes
    ///
    /// On failure the error is [`StenoError::Synthesis`] and carries the WAV
    /// written so far, which always has a valid header.
    pub fn synthesize(
        &mut self,
        text: &str,
        ssml: bool,
        overrides: &Overrides,
    ) -> Result<Vec<u8>> {
        self.phase = SynthesisPhase::Configuring;
        let request = SynthesisRequest::new(text, ssml, &self.settings, overrides);
        debug!("Synthesis request: {:?}", request);

        self.phase = SynthesisPhase::Synthesizing;
        let mut wav = Vec::new();
        let mut assembler = WavAssembler::new(&mut wav);
        let streamed = stream_chunks(self.engine.as_mut(), &request, &mut assembler);

        self.phase = SynthesisPhase::Encoding;
        let finished = assembler.finish();
        self.phase = SynthesisPhase::Idle;

        match (streamed, finished) {
            (Ok(chunks), Ok(())) => {
                debug!("Synthesized {} chunk(s), {} WAV bytes", chunks, wav.len());
                Ok(wav)
            }
            (Err(e), finished) => {
                if let Err(f) = finished {
                    warn!("Could not finalize WAV after failure: {}", f);
                }
                Err(StenoError::Synthesis {
                    message: e.to_string(),
                    wav,
                })
            }
            (Ok(_), Err(e)) => Err(StenoError::Synthesis {
                message: e.to_string(),
                wav,
            }),
        }
    }

    /// Synthesize and play, blocking until playback ends
    pub fn synthesize_and_play(
        &mut self,
        text: &str,
        ssml: bool,
        overrides: &Overrides,
    ) -> Result<()> {
        let wav = self.synthesize(text, ssml, overrides)?;

        self.phase = SynthesisPhase::Playing;
        let played = play_wav_bytes(self.player.as_mut(), &wav);
        self.phase = SynthesisPhase::Idle;
        played
    }

    /// Speak a rendered SSML document with the session defaults
    pub fn speak_document(&mut self, document: &SsmlDocument) -> Result<()> {
        self.synthesize_and_play(&document.render(), true, &Overrides::default())
    }
}

/// Feed every chunk the engine yields into the assembler
fn stream_chunks(
    engine: &mut dyn SpeechEngine,
    request: &SynthesisRequest,
    assembler: &mut WavAssembler<'_>,
) -> Result<usize> {
    let mut count = 0;
    for chunk in engine.speak(request)? {
        assembler.push(&chunk?)?;
        count += 1;
    }
    Ok(count)
}

impl Drop for TtsSession {
    fn drop(&mut self) {
        debug!("Closing TTS session ({})", self.engine.name());
    }
}
