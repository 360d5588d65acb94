//! Mimic 3 backend
//!
//! Runs the `mimic3` command line tool once per request. Text (or SSML) goes
//! in on stdin and a WAV file comes back on stdout.
//!
//! Dependencies:
//! - mimic3 (install with: pip install mycroft-mimic3-tts)

use crate::audio::decode_wav;
use crate::speech::{AudioResults, SpeechEngine, SynthesisRequest};
use crate::{Result, StenoError};
use log::{debug, error, info};
use std::io::Write;
use std::process::{Command, Stdio};

/// Mimic 3 backend
pub struct Mimic3Engine {
    /// Path to mimic3
    program: String,

    /// Path to the voice downloader shipped with mimic3
    download_program: String,

    /// Voices already made available
    preloaded: Vec<String>,
}

impl Mimic3Engine {
    /// Create a new Mimic 3 engine
    ///
    /// Verifies the `mimic3` executable can be run
    pub fn new() -> Result<Self> {
        debug!("Creating Mimic 3 backend");
        let program = Self::find_program(&["mimic3"])?;
        Ok(Self {
            program,
            download_program: "mimic3-download".to_string(),
            preloaded: Vec::new(),
        })
    }

    fn find_program(paths: &[&str]) -> Result<String> {
        for path in paths {
            if let Ok(status) = Command::new(path)
                .arg("--version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
            {
                if status.success() {
                    return Ok(path.to_string());
                }
            }
        }

        Err(StenoError::Speech(
            "mimic3 not found. Install with: pip install mycroft-mimic3-tts".to_string(),
        ))
    }

    /// Command line arguments for one request, text excluded
    fn args(request: &SynthesisRequest) -> Vec<String> {
        let mut args = vec!["--voice".to_string(), request.voice.clone()];

        if let Some(speaker) = &request.speaker {
            args.push("--speaker".to_string());
            args.push(speaker.clone());
        }
        if let Some(scale) = request.length_scale {
            args.push("--length-scale".to_string());
            args.push(scale.to_string());
        }
        if let Some(scale) = request.noise_scale {
            args.push("--noise-scale".to_string());
            args.push(scale.to_string());
        }
        if let Some(w) = request.noise_w {
            args.push("--noise-w".to_string());
            args.push(w.to_string());
        }
        if request.ssml {
            args.push("--ssml".to_string());
        }
        args.push("--stdout".to_string());
        args
    }

    /// Voices made available so far
    pub fn preloaded(&self) -> &[String] {
        &self.preloaded
    }
}

impl SpeechEngine for Mimic3Engine {
    fn name(&self) -> &str {
        "mimic3"
    }

    fn preload_voice(&mut self, voice: &str) -> Result<()> {
        if self.preloaded.iter().any(|v| v == voice) {
            return Ok(());
        }

        info!("Preloading voice {}", voice);
        let output = Command::new(&self.download_program)
            .arg(voice)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                StenoError::Speech(format!("Failed to run {}: {}", self.download_program, e))
            })?;

        if !output.status.success() {
            return Err(StenoError::Speech(format!(
                "Could not preload voice {}: {}",
                voice,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        self.preloaded.push(voice.to_string());
        Ok(())
    }

    fn speak(&mut self, request: &SynthesisRequest) -> Result<AudioResults<'_>> {
        let args = Self::args(request);
        debug!("Running {} {}", self.program, args.join(" "));

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                error!("Failed to spawn mimic3: {}", e);
                StenoError::Speech(format!("Failed to start mimic3: {}", e))
            })?;

        // mimic3 reads until EOF, so stdin must close before we wait
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| StenoError::Speech("mimic3 stdin unavailable".into()))?;
        stdin.write_all(request.text.as_bytes())?;
        drop(stdin);

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(StenoError::Speech(format!(
                "mimic3 exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let audio = decode_wav(&output.stdout)?;
        debug!(
            "mimic3 produced {} bytes at {} Hz",
            audio.audio_bytes.len(),
            audio.sample_rate_hz
        );
        Ok(Box::new(std::iter::once(Ok(audio))))
    }
}

impl Drop for Mimic3Engine {
    fn drop(&mut self) {
        debug!("Shutting down Mimic 3 backend");
    }
}
