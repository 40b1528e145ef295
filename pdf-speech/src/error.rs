use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("{0}")]
    Input(String),

    #[error("A conversion is already running")]
    Busy,

    #[error("Error reading PDF {}: {message}", path.display())]
    Extraction { path: PathBuf, message: String },

    #[error("Speech engine error: {0}")]
    Engine(String),

    #[error("TTS error for {}: {message}", path.display())]
    Render { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConversionError {
    /// No file was chosen before starting a run.
    pub fn no_file() -> Self {
        Self::Input("Please select a PDF file first".to_string())
    }

    /// The chosen file is not on disk.
    pub fn missing_file(path: &std::path::Path) -> Self {
        Self::Input(format!("Selected file does not exist: {}", path.display()))
    }
}

pub type Result<T> = std::result::Result<T, ConversionError>;
