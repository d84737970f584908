//! Error types for extraction, admission and submission

use crate::mode::Mode;

pub type Result<T> = std::result::Result<T, CaptureError>;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// Extracted text is shorter than the mode's admission threshold.
    /// Displays as the mode's user guidance.
    #[error("{}", .mode.rejection_guidance())]
    EmptyExtraction { mode: Mode, len: usize, min: usize },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend error ({status}): {body}")]
    Backend { status: u16, body: String },

    #[error("Unexpected backend response: {0}")]
    Decode(String),

    #[error("Fetching {url} failed with HTTP {status}")]
    PageFetch { url: String, status: u16 },

    #[error("Page script failed: {0}")]
    Script(String),

    #[error("Invalid selector '{0}'")]
    InvalidSelector(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CaptureError {
    /// Rejections are handled locally and never reach the backend.
    pub fn is_rejection(&self) -> bool {
        matches!(self, CaptureError::EmptyExtraction { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_message_carries_status_and_body() {
        let err = CaptureError::Backend {
            status: 500,
            body: "db error".to_string(),
        };
        assert_eq!(err.to_string(), "Backend error (500): db error");
        assert!(!err.is_rejection());
    }

    #[test]
    fn test_rejection_displays_guidance() {
        let err = CaptureError::EmptyExtraction {
            mode: Mode::Page,
            len: 12,
            min: 500,
        };
        assert!(err.is_rejection());
        assert_eq!(
            err.to_string(),
            "Whole page text seems too short. Try selecting the JD section instead."
        );
    }
}
