//! Extraction modes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which extraction strategy a capture runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// The user's highlighted text
    Selected,
    /// Rendered text of the whole body
    Page,
    /// Longest dense-text region matched by the selector catalog
    Smart,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Selected, Mode::Page, Mode::Smart];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Selected => "selected",
            Mode::Page => "page",
            Mode::Smart => "smart",
        }
    }

    /// Progress line shown while the page is being read.
    pub fn progress_message(self) -> &'static str {
        match self {
            Mode::Selected => "Extracting selected text...",
            Mode::Page => "Extracting whole page text...",
            Mode::Smart => "Extracting JD section (smart)...",
        }
    }

    /// What the user should do when this mode yields too little text.
    pub fn rejection_guidance(self) -> &'static str {
        match self {
            Mode::Selected => {
                "Selected text is empty/too short.\n\
                 Highlight the JD on the page first, then try again."
            }
            Mode::Page => "Whole page text seems too short. Try selecting the JD section instead.",
            Mode::Smart => "Smart capture got too little text. Try Whole Page Text.",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "selected" | "selection" => Ok(Mode::Selected),
            "page" | "whole-page" => Ok(Mode::Page),
            "smart" => Ok(Mode::Smart),
            other => Err(format!("unknown mode '{}'", other)),
        }
    }
}
