//! Speech engine traits and voice settings.

pub mod espeak;

use crate::error::{ConversionError, Result};
use serde::Serialize;
use std::path::Path;

/// Slowest accepted speech rate in words per minute.
pub const MIN_RATE_WPM: u32 = 50;
/// Fastest accepted speech rate in words per minute.
pub const MAX_RATE_WPM: u32 = 300;
/// Quietest accepted volume.
pub const MIN_VOLUME: f32 = 0.1;
/// Loudest accepted volume.
pub const MAX_VOLUME: f32 = 1.0;

pub const DEFAULT_RATE_WPM: u32 = 175;
pub const DEFAULT_VOLUME: f32 = 1.0;

/// Which voice the engine should speak with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VoiceSelection {
    /// Whatever the engine uses when no voice is set.
    #[default]
    Default,
    /// Position in the engine's voice list.
    Index(usize),
    /// Engine-specific voice identifier.
    Id(String),
}

impl VoiceSelection {
    /// Parse a user-supplied voice.
    ///
    /// Accepts "default" (any case), a bare index ("3"), a voice list entry
    /// ("3: English"), or anything else as a voice id.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("default") {
            return Self::Default;
        }

        let prefix = value.split(':').next().unwrap_or(value).trim();
        if let Ok(index) = prefix.parse::<usize>() {
            return Self::Index(index);
        }

        Self::Id(value.to_string())
    }
}

impl std::fmt::Display for VoiceSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Index(i) => write!(f, "{}", i),
            Self::Id(id) => write!(f, "{}", id),
        }
    }
}

/// Voice parameters applied to the engine once per run.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceSettings {
    /// Voice to speak with
    pub voice: VoiceSelection,
    /// Speech rate in words per minute (50-300)
    pub rate_wpm: u32,
    /// Volume (0.1-1.0)
    pub volume: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            voice: VoiceSelection::Default,
            rate_wpm: DEFAULT_RATE_WPM,
            volume: DEFAULT_VOLUME,
        }
    }
}

impl VoiceSettings {
    /// Create voice settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the voice.
    pub fn with_voice(mut self, voice: VoiceSelection) -> Self {
        self.voice = voice;
        self
    }

    /// Set the speech rate.
    pub fn with_rate(mut self, rate_wpm: u32) -> Self {
        self.rate_wpm = rate_wpm.clamp(MIN_RATE_WPM, MAX_RATE_WPM);
        self
    }

    /// Set the volume.
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = if volume.is_nan() {
            DEFAULT_VOLUME
        } else {
            volume.clamp(MIN_VOLUME, MAX_VOLUME)
        };
        self
    }
}

/// A voice offered by an engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Voice {
    /// Identifier passed back to the engine
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Language tag, if the engine reports one
    pub language: Option<String>,
}

/// Speech engine - all TTS engines implement this.
pub trait SpeechEngine: Send + Sync {
    /// Engine name for display.
    fn name(&self) -> &str;

    /// Voices the engine can speak with, in a stable order.
    fn voices(&self) -> Result<Vec<Voice>>;

    /// Initialize a renderer configured with the given settings.
    ///
    /// Fails with [`ConversionError::Engine`] if the engine is unavailable or
    /// a setting cannot be applied.
    fn open(&self, settings: &VoiceSettings) -> Result<Box<dyn SpeechRenderer>>;
}

/// A configured engine session that renders chunks to audio files.
pub trait SpeechRenderer: Send {
    /// Synthesize text into a WAV file. Blocks until the file is written.
    fn render_to_file(&mut self, text: &str, output_path: &Path) -> Result<()>;

    /// Release engine resources. Called once when the run ends.
    fn shutdown(&mut self) {}
}

/// Resolve a voice selection against an engine's voice list.
///
/// Returns `None` for the engine default.
pub fn resolve_voice(voices: &[Voice], selection: &VoiceSelection) -> Result<Option<String>> {
    match selection {
        VoiceSelection::Default => Ok(None),
        VoiceSelection::Index(index) => voices
            .get(*index)
            .map(|v| Some(v.id.clone()))
            .ok_or_else(|| {
                ConversionError::Engine(format!(
                    "Voice index {} out of range ({} voices available)",
                    index,
                    voices.len()
                ))
            }),
        VoiceSelection::Id(id) => voices
            .iter()
            .find(|v| v.id == *id || v.name.eq_ignore_ascii_case(id))
            .map(|v| Some(v.id.clone()))
            .ok_or_else(|| ConversionError::Engine(format!("Unknown voice: {}", id))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voices() -> Vec<Voice> {
        vec![
            Voice {
                id: "en".to_string(),
                name: "English".to_string(),
                language: Some("en".to_string()),
            },
            Voice {
                id: "fr-fr".to_string(),
                name: "French".to_string(),
                language: Some("fr-fr".to_string()),
            },
        ]
    }

    #[test]
    fn test_voice_settings_default() {
        let settings = VoiceSettings::default();
        assert_eq!(settings.voice, VoiceSelection::Default);
        assert_eq!(settings.rate_wpm, 175);
        assert_eq!(settings.volume, 1.0);
    }

    #[test]
    fn test_voice_settings_builder() {
        let settings = VoiceSettings::new()
            .with_voice(VoiceSelection::Id("en".to_string()))
            .with_rate(200)
            .with_volume(0.5);

        assert_eq!(settings.voice, VoiceSelection::Id("en".to_string()));
        assert_eq!(settings.rate_wpm, 200);
        assert_eq!(settings.volume, 0.5);
    }

    #[test]
    fn test_voice_settings_clamping() {
        let settings = VoiceSettings::new()
            .with_rate(10) // Should clamp to 50
            .with_volume(3.0); // Should clamp to 1.0
        assert_eq!(settings.rate_wpm, 50);
        assert_eq!(settings.volume, 1.0);

        let settings = VoiceSettings::new().with_rate(1000).with_volume(0.0);
        assert_eq!(settings.rate_wpm, 300);
        assert_eq!(settings.volume, 0.1);
    }

    #[test]
    fn test_voice_selection_parse() {
        assert_eq!(VoiceSelection::parse("Default"), VoiceSelection::Default);
        assert_eq!(VoiceSelection::parse(""), VoiceSelection::Default);
        assert_eq!(VoiceSelection::parse("2"), VoiceSelection::Index(2));
        assert_eq!(VoiceSelection::parse("1: French"), VoiceSelection::Index(1));
        assert_eq!(
            VoiceSelection::parse("en-us"),
            VoiceSelection::Id("en-us".to_string())
        );
    }

    #[test]
    fn test_resolve_voice() {
        let voices = voices();
        assert_eq!(resolve_voice(&voices, &VoiceSelection::Default).unwrap(), None);
        assert_eq!(
            resolve_voice(&voices, &VoiceSelection::Index(1)).unwrap(),
            Some("fr-fr".to_string())
        );
        assert_eq!(
            resolve_voice(&voices, &VoiceSelection::Id("english".to_string())).unwrap(),
            Some("en".to_string())
        );
    }

    #[test]
    fn test_resolve_voice_errors() {
        let voices = voices();
        assert!(matches!(
            resolve_voice(&voices, &VoiceSelection::Index(9)),
            Err(ConversionError::Engine(_))
        ));
        assert!(matches!(
            resolve_voice(&voices, &VoiceSelection::Id("klingon".to_string())),
            Err(ConversionError::Engine(_))
        ));
    }
}
