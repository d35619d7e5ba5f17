//! Configuration loaded from TOML, with defaults for every field.
//!
//! ```toml
//! [api]
//! base_url = "https://places.example.com/api"
//! timeout_secs = 10
//!
//! [ui]
//! reattach = "replace"   # or "overwrite"
//! ```
//!
//! `PLACEVIEW_API_URL` overrides `api.base_url`.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::directives::ReattachPolicy;
use crate::error::{Error, Result};

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "PLACEVIEW_API_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the places REST API, without the `/places` suffix.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UiConfig {
    /// What rebinding a click-outside element without detaching does.
    pub reattach: ReattachPolicy,
}

impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` (defaults when `None`), then apply the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                info!(path = %path.display(), "loading config");
                let text = std::fs::read_to_string(path)?;
                toml::from_str(&text)?
            }
            None => Config::default(),
        };

        let config = config.with_api_url(std::env::var(API_URL_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Replace the API base URL when `url` is a non-blank value.
    pub fn with_api_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|url| !url.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        let url = &self.api.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config {
                message: format!("api.base_url must be an http(s) URL, got {url:?}"),
            });
        }
        if self.api.timeout_secs == 0 {
            return Err(Error::Config {
                message: "api.timeout_secs must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api.base_url, "http://localhost:3000");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.ui.reattach, ReattachPolicy::Replace);
    }

    #[test]
    fn test_partial_document() {
        let config = Config::from_toml_str(
            r#"
            [api]
            base_url = "https://places.example.com/api"

            [ui]
            reattach = "overwrite"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://places.example.com/api");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.ui.reattach, ReattachPolicy::Overwrite);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Config::from_toml_str("[api]\nbase_url = \"ftp://x\"").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));

        let err = Config::from_toml_str("[api]\ntimeout_secs = 0").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));

        let err = Config::from_toml_str("[ui]\nreattach = \"sometimes\"").unwrap_err();
        assert!(matches!(err, Error::TomlDe(_)));
    }

    #[test]
    fn test_api_url_override() {
        let config = Config::default().with_api_url(Some(" http://10.0.0.2:8080 ".to_string()));
        assert_eq!(config.api.base_url, "http://10.0.0.2:8080");

        let config = Config::default().with_api_url(Some("   ".to_string()));
        assert_eq!(config.api.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\ntimeout_secs = 3").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.api.timeout_secs, 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/placeview.toml"))).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
