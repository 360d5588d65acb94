//! Configuration management

use crate::speech::VoiceSettings;
use crate::steno::MappingOrientation;
use crate::{Result, StenoError};
use ini::Ini;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "stenospeak.cfg";

/// Application configuration
///
/// Holds input file locations, dictionary layout, voice parameters and
/// playback preferences. Every getter falls back to a default so a partial
/// file is fine.
pub struct Config {
    /// INI configuration storage
    ini: Ini,

    /// Config file path
    path: PathBuf,
}

impl Config {
    /// Load `stenospeak.cfg` from the working directory, writing defaults if missing
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from `path`, writing defaults if it does not exist
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        debug!("Loading config from {:?}", path);

        let ini = if path.exists() {
            Ini::load_from_file(&path)
                .map_err(|e| StenoError::IniParse(format!("Failed to load config: {}", e)))?
        } else {
            info!("Config file not found, creating default at {:?}", path);
            let default = Self::default_config();
            default
                .write_to_file(&path)
                .map_err(|e| StenoError::IniParse(format!("Failed to write config: {}", e)))?;
            default
        };

        Ok(Self { ini, path })
    }

    /// Build a configuration holding only the defaults, not backed by a file
    pub fn defaults() -> Self {
        Self {
            ini: Self::default_config(),
            path: PathBuf::from(CONFIG_FILE),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        debug!("Saving config to {:?}", self.path);
        self.ini
            .write_to_file(&self.path)
            .map_err(|e| StenoError::Config(format!("Failed to save config: {}", e)))
    }

    /// Expose the config file path for display
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn default_config() -> Ini {
        let mut ini = Ini::new();

        ini.with_section(Some("paths"))
            .set("mapping", "data/stened.json")
            .set("sentences", "sentences.txt");

        ini.with_section(Some("steno"))
            .set("orientation", "word_to_stroke");

        ini.with_section(Some("voice"))
            .set("engine", "auto")
            .set("voice", "en_UK/apope_low")
            .set("speaker", "")
            .set("rate", "0.6")
            .set("length_scale", "")
            .set("noise_scale", "")
            .set("noise_w", "")
            .set("preload", "en_UK/apope_low");

        ini.with_section(Some("ssml")).set("sentence_pause", "1");

        ini.with_section(Some("playback")).set("player", "auto");

        ini
    }

    /// Get a string value from config
    pub fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.ini
            .get_from(Some(section), key)
            .unwrap_or(default)
            .to_string()
    }

    /// Get a float value from config
    pub fn get_float(&self, section: &str, key: &str, default: f32) -> f32 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Get an optional float; empty or unparsable values are `None`
    pub fn get_opt_float(&self, section: &str, key: &str) -> Option<f32> {
        let raw = self.ini.get_from(Some(section), key)?.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring non-numeric {}.{} = {:?}", section, key, raw);
                None
            }
        }
    }

    /// Set a value in config
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.ini.with_section(Some(section)).set(key, value);
    }

    /// Steno dictionary JSON file
    pub fn mapping_path(&self) -> PathBuf {
        PathBuf::from(self.get_string("paths", "mapping", "data/stened.json"))
    }

    /// Sentence script file
    pub fn sentences_path(&self) -> PathBuf {
        PathBuf::from(self.get_string("paths", "sentences", "sentences.txt"))
    }

    /// Which side of the dictionary JSON holds the written words
    pub fn orientation(&self) -> Result<MappingOrientation> {
        self.get_string("steno", "orientation", "word_to_stroke")
            .parse()
    }

    /// Speech engine selection: `auto`, `mimic3` or `espeak`
    pub fn engine(&self) -> String {
        self.get_string("voice", "engine", "auto")
    }

    /// Audio player selection: `auto`, `rodio` or a command name
    pub fn player(&self) -> String {
        self.get_string("playback", "player", "auto")
    }

    /// Pause between sentences, in seconds, as written into the SSML
    pub fn sentence_pause(&self) -> String {
        self.get_string("ssml", "sentence_pause", "1")
    }

    /// Session-wide voice defaults
    pub fn voice_settings(&self) -> VoiceSettings {
        let speaker = self.get_string("voice", "speaker", "");
        let preload = self
            .get_string("voice", "preload", "")
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect();

        VoiceSettings {
            voice: self.get_string("voice", "voice", "en_UK/apope_low"),
            speaker: Some(speaker.trim().to_string()).filter(|s| !s.is_empty()),
            rate: self.get_float("voice", "rate", 0.6),
            length_scale: self.get_opt_float("voice", "length_scale"),
            noise_scale: self.get_opt_float("voice", "noise_scale"),
            noise_w: self.get_opt_float("voice", "noise_w"),
            preload,
        }
    }
}
