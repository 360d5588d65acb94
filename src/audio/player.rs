//! Local audio playback
//!
//! Synthesized audio is written to a temporary `.wav` file and handed to a
//! player that blocks until the sound has finished.

use crate::{Result, StenoError};
use log::{debug, info};
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Command, Stdio};

/// Something that can play a WAV file to completion
pub trait AudioPlayer: Send {
    /// Player name for logs
    fn name(&self) -> &str;

    /// Play the file, returning once playback is done
    fn play_file(&mut self, path: &Path) -> Result<()>;
}

/// Play WAV bytes through a temporary file
///
/// The file is removed when this returns, on success or failure.
pub fn play_wav_bytes(player: &mut dyn AudioPlayer, wav: &[u8]) -> Result<()> {
    let mut file = tempfile::Builder::new()
        .prefix("stenospeak-")
        .suffix(".wav")
        .tempfile()?;
    file.write_all(wav)?;
    file.flush()?;

    debug!(
        "Playing {} bytes from {:?} with {}",
        wav.len(),
        file.path(),
        player.name()
    );
    player.play_file(file.path())
}

/// Plays files by running a command-line player
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandPlayer {
    /// Players tried in order
    const CANDIDATES: &'static [(&'static str, &'static [&'static str])] = &[
        ("paplay", &[]),
        ("aplay", &["-q"]),
        ("afplay", &[]),
    ];

    /// Use the first player found on this system
    pub fn new() -> Result<Self> {
        for (program, args) in Self::CANDIDATES {
            if Self::is_available(program) {
                debug!("Found audio player: {}", program);
                return Ok(Self {
                    program: program.to_string(),
                    args: args.iter().map(|a| a.to_string()).collect(),
                });
            }
        }

        Err(StenoError::Playback(
            "No audio player found. Install pulseaudio-utils (paplay) or alsa-utils (aplay)"
                .to_string(),
        ))
    }

    /// Use a specific program; it is called as `program <file>`
    pub fn with_program(program: &str) -> Result<Self> {
        if !Self::is_available(program) {
            return Err(StenoError::Playback(format!(
                "Audio player '{}' not found",
                program
            )));
        }
        let args = Self::CANDIDATES
            .iter()
            .find(|(name, _)| *name == program)
            .map(|(_, args)| args.iter().map(|a| a.to_string()).collect())
            .unwrap_or_default();
        Ok(Self {
            program: program.to_string(),
            args,
        })
    }

    /// A program counts as available if it can be spawned at all
    fn is_available(program: &str) -> bool {
        match Command::new(program)
            .arg("--help")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(_) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => {
                debug!("Probing {} failed: {}", program, e);
                false
            }
        }
    }
}

impl AudioPlayer for CommandPlayer {
    fn name(&self) -> &str {
        &self.program
    }

    fn play_file(&mut self, path: &Path) -> Result<()> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| StenoError::Playback(format!("Failed to start {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(StenoError::Playback(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

/// In-process playback on the default output device
#[cfg(feature = "rodio")]
pub struct RodioPlayer;

#[cfg(feature = "rodio")]
impl AudioPlayer for RodioPlayer {
    fn name(&self) -> &str {
        "rodio"
    }

    fn play_file(&mut self, path: &Path) -> Result<()> {
        use std::fs::File;
        use std::io::BufReader;

        let stream = rodio::OutputStreamBuilder::open_default_stream()
            .map_err(|e| StenoError::Playback(format!("Failed to open output stream: {}", e)))?;
        let sink = rodio::Sink::connect_new(stream.mixer());

        let file = File::open(path)?;
        let source = rodio::Decoder::new(BufReader::new(file))
            .map_err(|e| StenoError::Playback(format!("Failed to decode audio: {}", e)))?;

        sink.append(source);
        sink.sleep_until_end();
        Ok(())
    }
}

#[cfg(feature = "rodio")]
fn default_player() -> Result<Box<dyn AudioPlayer>> {
    info!("Using rodio audio output");
    Ok(Box::new(RodioPlayer))
}

#[cfg(not(feature = "rodio"))]
fn default_player() -> Result<Box<dyn AudioPlayer>> {
    let player = CommandPlayer::new()?;
    info!("Using {} for audio output", player.name());
    Ok(Box::new(player))
}

#[cfg(feature = "rodio")]
fn rodio_player() -> Result<Box<dyn AudioPlayer>> {
    Ok(Box::new(RodioPlayer))
}

#[cfg(not(feature = "rodio"))]
fn rodio_player() -> Result<Box<dyn AudioPlayer>> {
    Err(StenoError::Config(
        "rodio playback requested but stenospeak was built without the `rodio` feature"
            .to_string(),
    ))
}

/// Create an audio player
///
/// `auto` prefers in-process playback when built with the `rodio` feature,
/// otherwise the first command-line player found. `rodio` requires the
/// feature. Anything else is taken as a player program name.
pub fn create_player(kind: &str) -> Result<Box<dyn AudioPlayer>> {
    match kind.trim() {
        "" | "auto" => default_player(),
        "rodio" => rodio_player(),
        program => {
            let player = CommandPlayer::with_program(program)?;
            info!("Using {} for audio output", player.name());
            Ok(Box::new(player))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    struct ReadBack {
        seen: Vec<u8>,
    }

    impl AudioPlayer for ReadBack {
        fn name(&self) -> &str {
            "read-back"
        }

        fn play_file(&mut self, path: &Path) -> Result<()> {
            assert_eq!(path.extension().and_then(|e| e.to_str()), Some("wav"));
            self.seen = fs::read(path)?;
            Ok(())
        }
    }

    #[test]
    fn test_temp_file_holds_bytes() {
        let mut player = ReadBack { seen: Vec::new() };
        play_wav_bytes(&mut player, b"RIFF....WAVE").unwrap();
        assert_eq!(player.seen, b"RIFF....WAVE");
    }

    #[test]
    fn test_missing_program() {
        assert!(matches!(
            CommandPlayer::with_program("definitely-not-a-player-binary"),
            Err(StenoError::Playback(_))
        ));
    }

    #[test]
    fn test_create_player() {
        match create_player("auto") {
            Ok(player) => println!("✓ Audio player available: {}", player.name()),
            Err(e) => println!("⚠ No audio player (may be expected in CI): {}", e),
        }
    }
}
