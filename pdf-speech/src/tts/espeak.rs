//! eSpeak NG speech backend driven through its command line.
//!
//! Each chunk is one `espeak-ng` invocation writing a WAV file. Text is fed
//! on stdin so chunks starting with `-` are never mistaken for flags.

use super::{SpeechEngine, SpeechRenderer, Voice, VoiceSettings, resolve_voice};
use crate::error::{ConversionError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Default synthesizer executable.
pub const DEFAULT_COMMAND: &str = "espeak-ng";

/// eSpeak NG engine.
#[derive(Debug, Clone)]
pub struct EspeakEngine {
    /// Executable to run
    command: PathBuf,
}

impl Default for EspeakEngine {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND)
    }
}

impl EspeakEngine {
    /// Create an engine that runs the given executable.
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Version string reported by the executable.
    pub fn version(&self) -> Result<String> {
        let output = Command::new(&self.command)
            .arg("--version")
            .output()
            .map_err(|e| self.unavailable(e))?;

        if !output.status.success() {
            return Err(ConversionError::Engine(format!(
                "{} --version failed: {}",
                self.command.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn unavailable(&self, e: std::io::Error) -> ConversionError {
        ConversionError::Engine(format!(
            "Failed to run {}: {}. Is eSpeak NG installed?",
            self.command.display(),
            e
        ))
    }
}

impl SpeechEngine for EspeakEngine {
    fn name(&self) -> &str {
        "espeak-ng"
    }

    fn voices(&self) -> Result<Vec<Voice>> {
        let output = Command::new(&self.command)
            .arg("--voices")
            .output()
            .map_err(|e| self.unavailable(e))?;

        if !output.status.success() {
            return Err(ConversionError::Engine(format!(
                "Failed to list voices: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(parse_voice_list(&String::from_utf8_lossy(&output.stdout)))
    }

    fn open(&self, settings: &VoiceSettings) -> Result<Box<dyn SpeechRenderer>> {
        let version = self.version()?;
        log::info!("Using {}", version);

        let voices = if settings.voice == super::VoiceSelection::Default {
            Vec::new()
        } else {
            self.voices()?
        };
        let voice = resolve_voice(&voices, &settings.voice)?;

        Ok(Box::new(EspeakRenderer {
            command: self.command.clone(),
            voice,
            rate_wpm: settings.rate_wpm,
            amplitude: volume_to_amplitude(settings.volume),
        }))
    }
}

/// A configured eSpeak NG session.
#[derive(Debug)]
pub struct EspeakRenderer {
    command: PathBuf,
    voice: Option<String>,
    rate_wpm: u32,
    amplitude: u32,
}

impl EspeakRenderer {
    /// Arguments for one synthesis call.
    fn args(&self, output_path: &Path) -> Vec<String> {
        let mut args = vec![
            "-w".to_string(),
            output_path.to_string_lossy().into_owned(),
            "-s".to_string(),
            self.rate_wpm.to_string(),
            "-a".to_string(),
            self.amplitude.to_string(),
        ];
        if let Some(ref voice) = self.voice {
            args.push("-v".to_string());
            args.push(voice.clone());
        }
        args.push("--stdin".to_string());
        args
    }
}

impl SpeechRenderer for EspeakRenderer {
    fn render_to_file(&mut self, text: &str, output_path: &Path) -> Result<()> {
        let render_error = |message: String| ConversionError::Render {
            path: output_path.to_path_buf(),
            message,
        };

        let mut child = Command::new(&self.command)
            .args(self.args(output_path))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| render_error(e.to_string()))?;

        // Stdin is closed at the end of this statement, before waiting.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };

        // Always reap the child; an early exit shows up as a broken pipe above.
        let output = child
            .wait_with_output()
            .map_err(|e| render_error(e.to_string()))?;

        if !output.status.success() {
            return Err(render_error(format!(
                "espeak-ng exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        written.map_err(|e| render_error(format!("Failed to send text to espeak-ng: {}", e)))
    }

    fn shutdown(&mut self) {
        log::debug!("espeak-ng session closed");
    }
}

/// Map volume (0.1-1.0) to eSpeak amplitude (10-100).
fn volume_to_amplitude(volume: f32) -> u32 {
    (volume * 100.0).round() as u32
}

/// Parse the table printed by `espeak-ng --voices`.
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  5  af              --/M      Afrikaans          gmw/af
/// ```
fn parse_voice_list(output: &str) -> Vec<Voice> {
    output
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 4 || fields[0] == "Pty" {
                return None;
            }
            Some(Voice {
                id: fields[1].to_string(),
                name: fields[3].replace('_', " "),
                language: Some(fields[1].to_string()),
            })
        })
        .collect()
}
