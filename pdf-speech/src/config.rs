//! pdf-speech configuration management.

use crate::text::DEFAULT_MAX_CHARS;
use crate::tts::{self, VoiceSelection, VoiceSettings};
use crate::worker::{ConversionSettings, RenderFailurePolicy};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfSpeechConfig {
    /// Default voice ("default", an index, or an engine voice id)
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Speech rate in words per minute (50-300)
    #[serde(default = "default_rate")]
    pub rate: u32,

    /// Volume (0.1-1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,

    /// Maximum characters per chunk
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Base storage location. None means the home directory.
    #[serde(default)]
    pub storage_root: Option<PathBuf>,

    /// What to do when a chunk fails to render
    #[serde(default)]
    pub on_render_error: RenderFailurePolicy,

    /// eSpeak NG executable
    #[serde(default = "default_espeak_command")]
    pub espeak_command: String,
}

fn default_voice() -> String {
    "default".to_string()
}

fn default_rate() -> u32 {
    tts::DEFAULT_RATE_WPM
}

fn default_volume() -> f32 {
    tts::DEFAULT_VOLUME
}

fn default_max_chars() -> usize {
    DEFAULT_MAX_CHARS
}

fn default_espeak_command() -> String {
    tts::espeak::DEFAULT_COMMAND.to_string()
}

impl Default for PdfSpeechConfig {
    fn default() -> Self {
        Self {
            voice: default_voice(),
            rate: default_rate(),
            volume: default_volume(),
            max_chars: default_max_chars(),
            storage_root: None,
            on_render_error: RenderFailurePolicy::default(),
            espeak_command: default_espeak_command(),
        }
    }
}

impl PdfSpeechConfig {
    /// Get the config file path: ~/.config/cli-programs/pdf-speech.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("cli-programs")
            .join("pdf-speech.toml"))
    }

    /// Load config from file, returning default if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: PdfSpeechConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Run settings built from this config, with values clamped to range.
    pub fn conversion_settings(&self) -> ConversionSettings {
        ConversionSettings {
            voice: VoiceSettings::new()
                .with_voice(VoiceSelection::parse(&self.voice))
                .with_rate(self.rate)
                .with_volume(self.volume),
            max_chars: self.max_chars.max(1),
            on_render_error: self.on_render_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PdfSpeechConfig::default();
        assert_eq!(config.voice, "default");
        assert_eq!(config.rate, 175);
        assert_eq!(config.volume, 1.0);
        assert_eq!(config.max_chars, 1500);
        assert!(config.storage_root.is_none());
        assert_eq!(config.on_render_error, RenderFailurePolicy::Continue);
        assert_eq!(config.espeak_command, "espeak-ng");
    }

    #[test]
    fn test_config_path() {
        let path = PdfSpeechConfig::config_path();
        assert!(path.is_ok());
        let path = path.unwrap();
        assert!(path.ends_with("cli-programs/pdf-speech.toml"));
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
voice = "en-us"
rate = 220
volume = 0.6
max_chars = 800
storage_root = "/storage/emulated/0"
on_render_error = "abort"
espeak_command = "/usr/local/bin/espeak-ng"
"#;
        let config: PdfSpeechConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.voice, "en-us");
        assert_eq!(config.rate, 220);
        assert_eq!(config.volume, 0.6);
        assert_eq!(config.max_chars, 800);
        assert_eq!(config.storage_root, Some(PathBuf::from("/storage/emulated/0")));
        assert_eq!(config.on_render_error, RenderFailurePolicy::Abort);
        assert_eq!(config.espeak_command, "/usr/local/bin/espeak-ng");
    }

    #[test]
    fn test_parse_empty_config() {
        let config: PdfSpeechConfig = toml::from_str("").unwrap();
        assert_eq!(config.voice, "default");
        assert_eq!(config.rate, 175);
        assert_eq!(config.max_chars, 1500);
        assert_eq!(config.on_render_error, RenderFailurePolicy::Continue);
    }

    #[test]
    fn test_conversion_settings_clamps() {
        let config = PdfSpeechConfig {
            voice: "2: French".to_string(),
            rate: 900,
            volume: 0.0,
            max_chars: 0,
            ..PdfSpeechConfig::default()
        };
        let settings = config.conversion_settings();
        assert_eq!(settings.voice.voice, VoiceSelection::Index(2));
        assert_eq!(settings.voice.rate_wpm, 300);
        assert_eq!(settings.voice.volume, 0.1);
        assert_eq!(settings.max_chars, 1);
    }
}
