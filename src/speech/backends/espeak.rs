//! espeak-ng backend
//!
//! Fallback engine when Mimic 3 is not installed. Text goes in on stdin with
//! `--stdin`, and espeak-ng writes a WAV file to stdout with `--stdout`. The
//! header of that WAV has placeholder sizes, which `decode_wav` tolerates.
//! SSML is understood with `-m`. It has no noise parameters, so those are
//! ignored.
//!
//! Dependencies:
//! - espeak-ng (install with: sudo apt install espeak-ng)

use crate::audio::decode_wav;
use crate::speech::{AudioResults, SpeechEngine, SynthesisRequest};
use crate::{Result, StenoError};
use log::{debug, error};
use std::io::Write;
use std::process::{Command, Stdio};

/// espeak-ng default speed in words per minute
const DEFAULT_WPM: f32 = 175.0;

/// espeak-ng backend
pub struct EspeakEngine {
    /// Path to espeak-ng
    espeak_path: String,
}

impl EspeakEngine {
    /// Create a new espeak-ng engine
    ///
    /// Verifies espeak-ng is available
    pub fn new() -> Result<Self> {
        debug!("Creating espeak-ng backend");
        let espeak_path = Self::find_espeak()?;
        debug!("Found espeak-ng at: {}", espeak_path);
        Ok(Self { espeak_path })
    }

    /// Find espeak-ng executable
    fn find_espeak() -> Result<String> {
        let paths = vec!["espeak-ng", "/usr/bin/espeak-ng"];

        for path in paths {
            if let Ok(output) = Command::new(path)
                .arg("--version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
            {
                if output.success() {
                    return Ok(path.to_string());
                }
            }
        }

        Err(StenoError::Speech(
            "espeak-ng not found. Install with: sudo apt install espeak-ng".to_string(),
        ))
    }

    /// Convert a length scale (2.0 = twice as long) to espeak speed (80-450 wpm)
    fn length_scale_to_speed(length_scale: Option<f32>) -> u16 {
        let scale = length_scale.filter(|s| *s > 0.0).unwrap_or(1.0);
        (DEFAULT_WPM / scale).round().clamp(80.0, 450.0) as u16
    }

    /// Map a Mimic-style voice key (`en_UK/apope_low`) to an espeak language
    fn espeak_voice(voice: &str) -> String {
        let language = voice
            .split('/')
            .next()
            .unwrap_or(voice)
            .to_lowercase()
            .replace('_', "-");
        match language.as_str() {
            "en-uk" => "en-gb".to_string(),
            "" => "en".to_string(),
            _ => language,
        }
    }

    /// Command line arguments for one request, text excluded
    fn args(request: &SynthesisRequest) -> Vec<String> {
        let mut args = vec![
            "-v".to_string(),
            Self::espeak_voice(&request.voice),
            "-s".to_string(),
            Self::length_scale_to_speed(request.length_scale).to_string(),
        ];
        if request.ssml {
            args.push("-m".to_string());
        }
        args.push("--stdin".to_string());
        args.push("--stdout".to_string());
        args
    }
}

impl SpeechEngine for EspeakEngine {
    fn name(&self) -> &str {
        "espeak-ng"
    }

    fn preload_voice(&mut self, voice: &str) -> Result<()> {
        debug!("espeak-ng voices need no preloading ({})", voice);
        Ok(())
    }

    fn speak(&mut self, request: &SynthesisRequest) -> Result<AudioResults<'_>> {
        if request.noise_scale.is_some() || request.noise_w.is_some() {
            debug!("espeak-ng ignores noise_scale/noise_w");
        }

        let args = Self::args(request);
        debug!("Running {} {}", self.espeak_path, args.join(" "));

        let mut child = Command::new(&self.espeak_path)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                error!("Failed to spawn espeak-ng: {}", e);
                StenoError::Speech(format!("Failed to start espeak-ng: {}", e))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| StenoError::Speech("espeak-ng stdin unavailable".into()))?;
        stdin.write_all(request.text.as_bytes())?;
        drop(stdin);

        let output = child.wait_with_output()?;

        if !output.status.success() {
            return Err(StenoError::Speech(format!(
                "espeak-ng exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let audio = decode_wav(&output.stdout)?;
        debug!(
            "espeak-ng produced {} bytes at {} Hz",
            audio.audio_bytes.len(),
            audio.sample_rate_hz
        );
        Ok(Box::new(std::iter::once(Ok(audio))))
    }
}

impl Drop for EspeakEngine {
    fn drop(&mut self) {
        debug!("Shutting down espeak-ng backend");
    }
}
