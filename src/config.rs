//! Layered settings.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, `ATTACKWATCH_*` environment variables, command-line flags.
//!
//! ```toml
//! base_url = "http://10.1.23.194:5000"
//! endpoint = "/update_data"
//! refresh = "30s"
//! request_timeout = "10s"
//! log_file = "attackwatch.log"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use ::config::{Config, Environment, File};
use serde::Deserialize;

use crate::duration::parse_duration;
use crate::source::{DEFAULT_BASE_URL, DEFAULT_ENDPOINT};

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "ATTACKWATCH";

/// Resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub endpoint: String,
    pub refresh: Duration,
    pub request_timeout: Option<Duration>,
    pub log_file: Option<PathBuf>,
}

/// Values given on the command line. `None` leaves lower layers in place.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub refresh: Option<String>,
    pub request_timeout: Option<String>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    base_url: String,
    endpoint: String,
    refresh: String,
    request_timeout: Option<String>,
    log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            refresh: crate::poller::DEFAULT_REFRESH,
            request_timeout: None,
            log_file: None,
        }
    }
}

impl Settings {
    /// Load settings from all layers.
    pub fn load(config_path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("endpoint", DEFAULT_ENDPOINT)?
            .set_default("refresh", "30s")?;

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .set_override_option("base_url", overrides.base_url.clone())?
            .set_override_option("refresh", overrides.refresh.clone())?
            .set_override_option("request_timeout", overrides.request_timeout.clone())?
            .set_override_option(
                "log_file",
                overrides
                    .log_file
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
            )?
            .build()
            .context("Failed to load configuration")?;

        let raw: RawSettings = config
            .try_deserialize()
            .context("Invalid configuration")?;
        Self::resolve(raw)
    }

    fn resolve(raw: RawSettings) -> Result<Self> {
        let refresh = parse_duration(&raw.refresh)
            .with_context(|| format!("Invalid refresh interval '{}'", raw.refresh))?;
        if refresh.is_zero() {
            anyhow::bail!("Refresh interval must be greater than zero");
        }

        let request_timeout = raw
            .request_timeout
            .as_deref()
            .map(parse_duration)
            .transpose()
            .context("Invalid request timeout")?;

        Ok(Self {
            base_url: raw.base_url,
            endpoint: raw.endpoint,
            refresh,
            request_timeout,
            log_file: raw.log_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::load(None, &Overrides::default()).unwrap();
        assert_eq!(settings.base_url, "http://127.0.0.1:5000");
        assert_eq!(settings.endpoint, "/update_data");
        assert_eq!(settings.refresh, Duration::from_secs(30));
        assert!(settings.request_timeout.is_none());
        assert!(settings.log_file.is_none());
    }

    #[test]
    fn test_file_layer() {
        let file = toml_file(
            r#"
            base_url = "http://10.1.23.194:5000"
            refresh = "5s"
            request_timeout = "2s"
            log_file = "dash.log"
            "#,
        );

        let settings = Settings::load(Some(file.path()), &Overrides::default()).unwrap();
        assert_eq!(settings.base_url, "http://10.1.23.194:5000");
        assert_eq!(settings.endpoint, "/update_data");
        assert_eq!(settings.refresh, Duration::from_secs(5));
        assert_eq!(settings.request_timeout, Some(Duration::from_secs(2)));
        assert_eq!(settings.log_file, Some(PathBuf::from("dash.log")));
    }

    #[test]
    fn test_overrides_beat_file() {
        let file = toml_file(r#"refresh = "5s""#);
        let overrides = Overrides {
            base_url: Some("http://override:9000".to_string()),
            refresh: Some("1m".to_string()),
            ..Default::default()
        };

        let settings = Settings::load(Some(file.path()), &overrides).unwrap();
        assert_eq!(settings.base_url, "http://override:9000");
        assert_eq!(settings.refresh, Duration::from_secs(60));
    }

    #[test]
    fn test_invalid_refresh() {
        let overrides = Overrides {
            refresh: Some("soon".to_string()),
            ..Default::default()
        };
        let err = Settings::load(None, &overrides).unwrap_err();
        assert!(err.to_string().contains("Invalid refresh interval"));
    }

    #[test]
    fn test_zero_refresh_rejected() {
        let overrides = Overrides {
            refresh: Some("0s".to_string()),
            ..Default::default()
        };
        assert!(Settings::load(None, &overrides).is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let result = Settings::load(
            Some(Path::new("/nonexistent/attackwatch.toml")),
            &Overrides::default(),
        );
        assert!(result.is_err());
    }
}
