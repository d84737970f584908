//! Capture pipeline: read the page, admit the text, submit it
//!
//! Each call is independent. Two captures started back to back both run to
//! completion with no shared state and no cancellation; whichever finishes
//! last writes the final status line.

use tracing::{info, instrument};

use crate::client::{SubmissionPayload, SubmissionResult, TailorClient};
use crate::dispatch::AdmissionPolicy;
use crate::error::{CaptureError, Result};
use crate::mode::Mode;
use crate::script::PageScript;
use crate::status::StatusSink;

/// What the caller asked for: a mode plus the two free-text fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    pub mode: Mode,
    pub company: String,
    pub role: String,
}

impl CaptureRequest {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            company: String::new(),
            role: String::new(),
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }
}

/// Read the page in `mode` and apply the admission policy.
pub async fn prepare<S>(script: &S, policy: &AdmissionPolicy, mode: Mode) -> Result<String>
where
    S: PageScript + ?Sized,
{
    let text = script.run(mode).await?;
    policy.admit(mode, text)
}

/// Full capture. Progress and the outcome go to `sink`; the outcome is also
/// returned.
#[instrument(skip_all, fields(mode = %request.mode))]
pub async fn capture<S>(
    script: &S,
    client: &TailorClient,
    policy: &AdmissionPolicy,
    request: &CaptureRequest,
    sink: &dyn StatusSink,
) -> Result<SubmissionResult>
where
    S: PageScript + ?Sized,
{
    let outcome = run(script, client, policy, request, sink).await;

    match &outcome {
        Ok(result) => sink.status(&done_message(result)),
        Err(err) => sink.status(&failure_message(err)),
    }

    outcome
}

async fn run<S>(
    script: &S,
    client: &TailorClient,
    policy: &AdmissionPolicy,
    request: &CaptureRequest,
    sink: &dyn StatusSink,
) -> Result<SubmissionResult>
where
    S: PageScript + ?Sized,
{
    sink.status(request.mode.progress_message());
    let text = prepare(script, policy, request.mode).await?;

    sink.status("Sending JD to backend...");
    let payload = SubmissionPayload::new(&request.company, &request.role, &text);
    let result = client.submit(&payload).await?;

    info!(txt = %result.saved_txt_to, docx = %result.saved_docx_to, "capture saved");
    Ok(result)
}

pub fn done_message(result: &SubmissionResult) -> String {
    format!(
        "✅ Done!\nSaved TXT: {}\nSaved DOCX: {}",
        result.saved_txt_to, result.saved_docx_to
    )
}

/// Rejections read as plain guidance; everything else is flagged as a failure.
pub fn failure_message(err: &CaptureError) -> String {
    if err.is_rejection() {
        err.to_string()
    } else {
        format!("❌ {}", err)
    }
}
