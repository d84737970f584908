//! Submission client for the local tailoring backend
//!
//! One `POST /tailor` per capture. Non-2xx bodies are kept verbatim so the
//! caller can see what the backend complained about. No retries.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use crate::error::{CaptureError, Result};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const TAILOR_PATH: &str = "tailor";
pub const COMPANY_PLACEHOLDER: &str = "Company";
pub const ROLE_PLACEHOLDER: &str = "Role";

/// Request body for `POST /tailor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub company: String,
    pub role: String,
    pub job_description: String,
}

impl SubmissionPayload {
    /// Empty company or role fall back to the literal placeholders.
    pub fn new(company: &str, role: &str, job_description: &str) -> Self {
        Self {
            company: or_placeholder(company, COMPANY_PLACEHOLDER),
            role: or_placeholder(role, ROLE_PLACEHOLDER),
            job_description: job_description.trim().to_string(),
        }
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

/// Paths the backend wrote. Opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub saved_txt_to: String,
    pub saved_docx_to: String,
    /// Tailored resume text, when the backend echoes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_txt: Option<String>,
}

/// `{base_url}/tailor`, keeping any path prefix on the base.
pub fn tailor_endpoint(base_url: &str) -> Result<Url> {
    let mut base = Url::parse(base_url.trim())?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(TAILOR_PATH)?)
}

/// Client construction failures are local misconfiguration, not transport.
pub(crate) fn build_http(builder: reqwest::ClientBuilder) -> Result<reqwest::Client> {
    builder
        .build()
        .map_err(|e| CaptureError::Config(format!("failed to build HTTP client: {}", e)))
}

#[derive(Debug, Clone)]
pub struct TailorClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl TailorClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, None)
    }

    /// `None` leaves the transport's default behaviour (no overall timeout).
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: build_http(builder)?,
            endpoint: tailor_endpoint(base_url)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionResult> {
        info!(
            endpoint = %self.endpoint,
            company = %payload.company,
            role = %payload.role,
            chars = payload.job_description.chars().count(),
            "submitting job description"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            warn!(status = status.as_u16(), "backend rejected submission");
            return Err(CaptureError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| CaptureError::Decode(e.to_string()))
    }
}
