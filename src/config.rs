//! TOML configuration
//!
//! All fields are optional so partial files work. A CWD `.jd-capture.toml`
//! overrides the platform file, and both sit under CLI flags and env vars.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::SelectorCatalog;
use crate::client::DEFAULT_BASE_URL;
use crate::error::{CaptureError, Result};
use crate::extract::{Extractor, MIN_CANDIDATE_CHARS};
use crate::fetch::DEFAULT_USER_AGENT;

pub const BACKEND_URL_ENV: &str = "JD_CAPTURE_BACKEND_URL";
const CWD_CONFIG: &str = ".jd-capture.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub backend: Option<BackendConfig>,
    pub defaults: Option<DefaultsConfig>,
    pub fetch: Option<FetchConfig>,
    pub extraction: Option<ExtractionConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub company: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Replaces the built-in selector catalog, in rank order
    pub selectors: Option<Vec<String>>,
    pub min_candidate_chars: Option<usize>,
}

/// Platform config path: `<config_dir>/jd-capture/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("jd-capture").join("config.toml"))
}

/// Platform file overlaid with the CWD file.
pub fn load_config() -> Result<ConfigFile> {
    load_cascade(config_path().as_deref(), Path::new("."))
}

/// `platform` overlaid with `<dir>/.jd-capture.toml`. Missing files are skipped.
pub fn load_cascade(platform: Option<&Path>, dir: &Path) -> Result<ConfigFile> {
    let platform = match platform {
        Some(path) => load_from_path(path)?,
        None => None,
    };
    let cwd = load_from_path(&dir.join(CWD_CONFIG))?;

    Ok(match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    })
}

/// `Ok(None)` when the file does not exist; parse errors are reported.
pub fn load_from_path(path: &Path) -> Result<Option<ConfigFile>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    toml::from_str(&content)
        .map(Some)
        .map_err(|e| CaptureError::Config(format!("{}: {}", path.display(), e)))
}

/// `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let backend_base = base.backend.unwrap_or_default();
    let backend_over = overlay.backend.unwrap_or_default();
    let defaults_base = base.defaults.unwrap_or_default();
    let defaults_over = overlay.defaults.unwrap_or_default();
    let fetch_base = base.fetch.unwrap_or_default();
    let fetch_over = overlay.fetch.unwrap_or_default();
    let extraction_base = base.extraction.unwrap_or_default();
    let extraction_over = overlay.extraction.unwrap_or_default();

    ConfigFile {
        backend: Some(BackendConfig {
            base_url: backend_over.base_url.or(backend_base.base_url),
            request_timeout_secs: backend_over
                .request_timeout_secs
                .or(backend_base.request_timeout_secs),
        }),
        defaults: Some(DefaultsConfig {
            company: defaults_over.company.or(defaults_base.company),
            role: defaults_over.role.or(defaults_base.role),
        }),
        fetch: Some(FetchConfig {
            user_agent: fetch_over.user_agent.or(fetch_base.user_agent),
        }),
        extraction: Some(ExtractionConfig {
            selectors: extraction_over.selectors.or(extraction_base.selectors),
            min_candidate_chars: extraction_over
                .min_candidate_chars
                .or(extraction_base.min_candidate_chars),
        }),
    }
}

/// Effective settings after applying built-in defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub request_timeout: Option<Duration>,
    pub default_company: Option<String>,
    pub default_role: Option<String>,
    pub user_agent: String,
    pub selectors: Option<Vec<String>>,
    pub min_candidate_chars: usize,
}

impl Default for Settings {
    fn default() -> Self {
        ConfigFile::default().resolve()
    }
}

impl ConfigFile {
    pub fn resolve(self) -> Settings {
        let backend = self.backend.unwrap_or_default();
        let defaults = self.defaults.unwrap_or_default();
        let fetch = self.fetch.unwrap_or_default();
        let extraction = self.extraction.unwrap_or_default();

        Settings {
            base_url: backend
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_timeout: backend.request_timeout_secs.map(Duration::from_secs),
            default_company: defaults.company.filter(|c| !c.is_empty()),
            default_role: defaults.role.filter(|r| !r.is_empty()),
            user_agent: fetch
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            selectors: extraction.selectors,
            min_candidate_chars: extraction
                .min_candidate_chars
                .unwrap_or(MIN_CANDIDATE_CHARS),
        }
    }
}

impl Settings {
    /// Environment overrides for values that also have CLI flags.
    pub fn apply_env(self) -> Self {
        self.with_backend_url(std::env::var(BACKEND_URL_ENV).ok())
    }

    /// Blank values leave the configured URL in place.
    pub fn with_backend_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url;
        }
        self
    }

    pub fn extractor(&self) -> Result<Extractor> {
        let catalog = match &self.selectors {
            Some(patterns) => SelectorCatalog::from_patterns(patterns)?,
            None => SelectorCatalog::default(),
        };
        Ok(Extractor::new(catalog).with_min_candidate_chars(self.min_candidate_chars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_resolve_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.base_url, "http://127.0.0.1:8000");
        assert_eq!(settings.request_timeout, None);
        assert_eq!(settings.min_candidate_chars, 800);
        assert_eq!(settings.default_company, None);
        assert_eq!(settings.extractor().unwrap().catalog().len(), 8);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r##"
[backend]
base_url = "http://localhost:9000"
request_timeout_secs = 30

[extraction]
selectors = ["#job-details", "main"]
"##
        )
        .unwrap();

        let config = load_from_path(file.path()).unwrap().unwrap();
        let settings = config.resolve();
        assert_eq!(settings.base_url, "http://localhost:9000");
        assert_eq!(settings.request_timeout, Some(Duration::from_secs(30)));

        let extractor = settings.extractor().unwrap();
        let patterns: Vec<&str> = extractor.catalog().iter().map(|e| e.pattern()).collect();
        assert_eq!(patterns, vec!["#job-details", "main"]);
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from_path(&dir.path().join("nope.toml")).unwrap().is_none());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[backend\nbase_url = ").unwrap();
        assert!(matches!(load_from_path(file.path()), Err(CaptureError::Config(_))));
    }

    #[test]
    fn test_merge_overlay_wins() {
        let base = ConfigFile {
            backend: Some(BackendConfig {
                base_url: Some("http://base".into()),
                request_timeout_secs: Some(5),
            }),
            defaults: Some(DefaultsConfig {
                company: Some("Base Co".into()),
                role: Some("Base Role".into()),
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            backend: Some(BackendConfig {
                base_url: Some("http://overlay".into()),
                request_timeout_secs: None,
            }),
            ..Default::default()
        };

        let settings = merge(base, overlay).resolve();
        assert_eq!(settings.base_url, "http://overlay");
        assert_eq!(settings.request_timeout, Some(Duration::from_secs(5)));
        assert_eq!(settings.default_company.as_deref(), Some("Base Co"));
        assert_eq!(settings.default_role.as_deref(), Some("Base Role"));
    }

    #[test]
    fn test_backend_url_override() {
        let settings = Settings::default().with_backend_url(Some("http://env:9000".into()));
        assert_eq!(settings.base_url, "http://env:9000");

        let settings = Settings::default().with_backend_url(Some("   ".into()));
        assert_eq!(settings.base_url, "http://127.0.0.1:8000");

        let settings = Settings::default().with_backend_url(None);
        assert_eq!(settings.base_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_env_var_beats_config_file() {
        let file = ConfigFile {
            backend: Some(BackendConfig {
                base_url: Some("http://from-file".into()),
                request_timeout_secs: None,
            }),
            ..Default::default()
        };
        let settings = file.resolve().with_backend_url(Some("http://from-env".into()));
        assert_eq!(settings.base_url, "http://from-env");
    }

    #[test]
    fn test_cwd_file_overrides_platform_file() {
        let platform_dir = tempfile::tempdir().unwrap();
        let platform = platform_dir.path().join("config.toml");
        std::fs::write(
            &platform,
            r#"
[backend]
base_url = "http://platform"
request_timeout_secs = 10

[defaults]
company = "Platform Co"
"#,
        )
        .unwrap();

        let cwd = tempfile::tempdir().unwrap();
        std::fs::write(
            cwd.path().join(".jd-capture.toml"),
            r#"
[backend]
base_url = "http://cwd"
"#,
        )
        .unwrap();

        let settings = load_cascade(Some(&platform), cwd.path()).unwrap().resolve();
        assert_eq!(settings.base_url, "http://cwd");
        assert_eq!(settings.request_timeout, Some(Duration::from_secs(10)));
        assert_eq!(settings.default_company.as_deref(), Some("Platform Co"));
    }

    #[test]
    fn test_cascade_without_files_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("config.toml");

        let config = load_cascade(Some(&missing), dir.path()).unwrap();
        assert_eq!(config, ConfigFile::default());
        assert_eq!(config.resolve(), Settings::default());

        assert_eq!(load_cascade(None, dir.path()).unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_cascade_reports_malformed_cwd_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".jd-capture.toml"), "[backend\n").unwrap();
        assert!(matches!(load_cascade(None, dir.path()), Err(CaptureError::Config(_))));
    }

    #[test]
    fn test_invalid_custom_selector() {
        let settings = Settings {
            selectors: Some(vec!["div[[".into()]),
            ..Settings::default()
        };
        assert!(matches!(settings.extractor(), Err(CaptureError::InvalidSelector(_))));
    }
}
