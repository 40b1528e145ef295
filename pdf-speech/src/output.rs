//! Output location for generated audio.

use std::path::{Path, PathBuf};

/// Subdirectory under the storage root that receives audio files.
const OUTPUT_SUBDIR: &[&str] = &["PDFtoSpeech", "output"];

/// Storage root used when none is configured: the user's home directory.
pub fn default_storage_root() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Output directory under a storage root: `<root>/PDFtoSpeech/output`.
pub fn output_dir(storage_root: &Path) -> PathBuf {
    OUTPUT_SUBDIR
        .iter()
        .fold(storage_root.to_path_buf(), |dir, part| dir.join(part))
}

/// Pick the output directory for a run.
///
/// An explicit directory wins; otherwise the policy directory under the
/// given (or default) storage root is used.
pub fn resolve_output_dir(explicit: Option<&Path>, storage_root: Option<&Path>) -> PathBuf {
    match explicit {
        Some(dir) => dir.to_path_buf(),
        None => match storage_root {
            Some(root) => output_dir(root),
            None => output_dir(&default_storage_root()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_dir() {
        let dir = output_dir(Path::new("/storage/emulated/0"));
        assert_eq!(dir, PathBuf::from("/storage/emulated/0/PDFtoSpeech/output"));
    }

    #[test]
    fn test_resolve_explicit_wins() {
        let dir = resolve_output_dir(Some(Path::new("/tmp/audio")), Some(Path::new("/data")));
        assert_eq!(dir, PathBuf::from("/tmp/audio"));
    }

    #[test]
    fn test_resolve_storage_root() {
        let dir = resolve_output_dir(None, Some(Path::new("/data")));
        assert_eq!(dir, PathBuf::from("/data/PDFtoSpeech/output"));
    }

    #[test]
    fn test_resolve_default_root() {
        let dir = resolve_output_dir(None, None);
        assert!(dir.ends_with("PDFtoSpeech/output"));
    }
}
