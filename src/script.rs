//! Page-script boundary
//!
//! Reading a page happens in a separate execution context (the target
//! page, a blocking worker, or a foreign host behind the C ABI). Only a
//! serializable [`ExtractionRequest`] goes in and a plain string comes out.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};

use crate::dom::HtmlPage;
use crate::error::{CaptureError, Result};
use crate::extract::Extractor;
use crate::mode::Mode;

/// Argument of one page read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRequest {
    pub mode: Mode,
    /// Selection the host captured from the live page
    #[serde(default)]
    pub selection: Option<String>,
}

/// Result of one page read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionOutput {
    pub mode: Mode,
    pub text: String,
    /// Length of `text` in characters
    pub length: usize,
}

impl ExtractionOutput {
    pub fn new(mode: Mode, text: String) -> Self {
        let length = text.chars().count();
        Self { mode, text, length }
    }
}

/// Parse `html` and run one request against it.
pub fn run_request(
    extractor: &Extractor,
    html: &str,
    request: &ExtractionRequest,
) -> ExtractionOutput {
    let page = HtmlPage::parse(html).with_selection(request.selection.clone());
    ExtractionOutput::new(request.mode, extractor.extract(&page, request.mode))
}

/// Single-shot read of a foreign page.
pub trait PageScript: Send + Sync {
    fn run(&self, mode: Mode) -> BoxFuture<'_, Result<String>>;
}

/// A page held as HTML source, read on a blocking worker since the parsed
/// document cannot cross threads.
#[derive(Debug, Clone)]
pub struct LocalPage {
    html: Arc<str>,
    selection: Option<String>,
    extractor: Arc<Extractor>,
}

impl LocalPage {
    pub fn new(html: impl Into<Arc<str>>) -> Self {
        Self {
            html: html.into(),
            selection: None,
            extractor: Arc::new(Extractor::default()),
        }
    }

    pub fn with_selection(mut self, selection: Option<String>) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_extractor(mut self, extractor: Arc<Extractor>) -> Self {
        self.extractor = extractor;
        self
    }
}

impl PageScript for LocalPage {
    fn run(&self, mode: Mode) -> BoxFuture<'_, Result<String>> {
        let html = Arc::clone(&self.html);
        let extractor = Arc::clone(&self.extractor);
        let request = ExtractionRequest {
            mode,
            selection: self.selection.clone(),
        };

        async move {
            tokio::task::spawn_blocking(move || run_request(&extractor, &html, &request).text)
                .await
                .map_err(|e| CaptureError::Script(e.to_string()))
        }
        .boxed()
    }
}
