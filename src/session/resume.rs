use crate::error::{Result, SessionError};
use std::path::Path;
use tracing::info;

/// Plain-text resume read once when selected and sent once at session start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeAttachment {
    pub filename: String,
    pub raw_text: String,
}

impl ResumeAttachment {
    /// Read a `.txt` resume from disk; `~` is expanded
    pub fn load(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path);
        let path = Path::new(expanded.as_ref());

        let is_txt = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("txt"))
            .unwrap_or(false);
        if !is_txt {
            return Err(SessionError::Resume(format!(
                "{} is not a plain text (.txt) file",
                path.display()
            )));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| SessionError::Resume(format!("{}: {}", path.display(), e)))?;

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resume.txt".to_string());

        info!("Loaded resume {} ({} bytes)", filename, bytes.len());

        Ok(Self::from_bytes(filename, &bytes))
    }

    /// Build an attachment from raw bytes, replacing invalid UTF-8
    pub fn from_bytes(filename: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            filename: filename.into(),
            raw_text: String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_txt_resume() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Resume.TXT");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "Five years of B2B sales.").unwrap();

        let resume = ResumeAttachment::load(path.to_str().unwrap()).unwrap();
        assert_eq!(resume.filename, "Resume.TXT");
        assert_eq!(resume.raw_text, "Five years of B2B sales.");
    }

    #[test]
    fn test_non_txt_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.pdf");
        std::fs::write(&path, b"%PDF").unwrap();

        let err = ResumeAttachment::load(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, SessionError::Resume(_)));
    }

    #[test]
    fn test_missing_file_rejected() {
        let err = ResumeAttachment::load("/nonexistent/resume.txt").unwrap_err();
        assert!(matches!(err, SessionError::Resume(_)));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let resume = ResumeAttachment::from_bytes("cv.txt", &[b'o', b'k', 0xff]);
        assert_eq!(resume.raw_text, "ok\u{fffd}");
    }
}
