//! Loading page HTML from a URL, a file or stdin

use std::io::Read;
use std::path::Path;

use url::Url;

use crate::client::build_http;
use crate::error::{CaptureError, Result};

pub const DEFAULT_USER_AGENT: &str = concat!("jd-capture/", env!("CARGO_PKG_VERSION"));

/// Fetch a live page. Only http(s) URLs are accepted.
pub async fn fetch_page(url: &str, user_agent: &str) -> Result<String> {
    let parsed = Url::parse(url)?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(CaptureError::Config(format!(
            "unsupported URL scheme '{}'",
            parsed.scheme()
        )));
    }

    let client = build_http(reqwest::Client::builder().user_agent(user_agent))?;

    tracing::debug!(%parsed, "fetching page");
    let response = client.get(parsed.clone()).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(CaptureError::PageFetch {
            url: parsed.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response.text().await?)
}

pub fn read_html_file(path: &Path) -> Result<String> {
    Ok(std::fs::read_to_string(path)?)
}

pub fn read_html_stdin() -> Result<String> {
    let mut html = String::new();
    std::io::stdin().read_to_string(&mut html)?;
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_page_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jobs/42"))
            .and(header("user-agent", "jd-capture-test"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<body>posting</body>"))
            .expect(1)
            .mount(&server)
            .await;

        let html = fetch_page(&format!("{}/jobs/42", server.uri()), "jd-capture-test")
            .await
            .unwrap();
        assert_eq!(html, "<body>posting</body>");
    }

    #[tokio::test]
    async fn test_fetch_page_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = fetch_page(&format!("{}/gone", server.uri()), DEFAULT_USER_AGENT)
            .await
            .unwrap_err();
        assert!(matches!(err, CaptureError::PageFetch { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_page_rejects_other_schemes() {
        let err = fetch_page("file:///etc/hosts", DEFAULT_USER_AGENT)
            .await
            .unwrap_err();
        assert!(matches!(err, CaptureError::Config(_)));
    }

    #[tokio::test]
    async fn test_fetch_page_bad_user_agent_is_config_error() {
        let err = fetch_page("http://127.0.0.1:8000/jobs", "bad\nagent")
            .await
            .unwrap_err();
        assert!(matches!(err, CaptureError::Config(_)), "{err:?}");
    }

    #[test]
    fn test_read_html_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<body>saved page</body>").unwrap();
        assert_eq!(read_html_file(file.path()).unwrap(), "<body>saved page</body>");
    }
}
