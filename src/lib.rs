//! Job-description capture
//!
//! Pulls job-description text out of arbitrary web pages and submits it to a
//! local tailoring backend:
//! - Selection, whole-page and dense-region extraction over a parsed DOM
//! - Per-mode minimum-length admission
//! - `POST /tailor` submission with verbatim backend errors
//! - C ABI for hosts that already hold the page HTML

pub mod capture;
pub mod catalog;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod dom;
pub mod error;
pub mod extract;
pub mod ffi;
pub mod fetch;
pub mod mode;
pub mod script;
pub mod status;

pub use capture::{capture, prepare, CaptureRequest};
pub use catalog::{CatalogEntry, SelectorCatalog, DEFAULT_SELECTORS};
pub use client::{SubmissionPayload, SubmissionResult, TailorClient};
pub use dispatch::AdmissionPolicy;
pub use dom::{HtmlPage, PageDom};
pub use error::{CaptureError, Result};
pub use extract::{Candidate, Extractor, MIN_CANDIDATE_CHARS};
pub use mode::Mode;
pub use script::{ExtractionOutput, ExtractionRequest, LocalPage, PageScript};
pub use status::{RecordingSink, StatusSink, TracingSink};
