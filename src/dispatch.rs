//! Per-mode admission policy for extracted text

use tracing::warn;

use crate::error::{CaptureError, Result};
use crate::mode::Mode;

/// Minimum lengths, in characters, a mode's output needs before submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionPolicy {
    pub selected_min: usize,
    pub page_min: usize,
    pub smart_min: usize,
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self {
            selected_min: 200,
            page_min: 500,
            smart_min: 500,
        }
    }
}

impl AdmissionPolicy {
    pub fn min_length(&self, mode: Mode) -> usize {
        match mode {
            Mode::Selected => self.selected_min,
            Mode::Page => self.page_min,
            Mode::Smart => self.smart_min,
        }
    }

    /// Pass the text through when long enough, else reject with guidance.
    pub fn admit(&self, mode: Mode, text: String) -> Result<String> {
        let min = self.min_length(mode);
        let len = text.chars().count();

        if len < min {
            warn!(%mode, len, min, "extracted text below admission threshold");
            return Err(CaptureError::EmptyExtraction { mode, len, min });
        }

        Ok(text)
    }
}
