//! Client configuration loaded via OrthoConfig.
//!
//! Every key is optional; accessors fall back to the defaults below.
//! Command-line flags handled by the binary take precedence over these
//! values.

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::FALLBACK_LANDSLIDE_ID_BASE;
use crate::outbound::default_session_path;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";

/// Configuration values for the landslide client.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LANDSLIDE")]
pub struct ClientSettings {
    /// Backend origin, e.g. `https://landslides.example`.
    pub base_url: Option<String>,
    /// File holding the persisted bearer token.
    pub session_file: Option<String>,
    /// Per-request timeout in seconds. Unset waits indefinitely.
    pub request_timeout_secs: Option<u64>,
    /// Base used to propose identifiers when the backend knows none.
    pub fallback_landslide_id: Option<u64>,
    /// Emit JSON log lines instead of human-readable ones.
    #[ortho_config(default = false)]
    pub log_json: bool,
}

/// Error raised when a configured value cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The base URL is not an absolute URL.
    #[error("invalid base URL {value:?}: {source}")]
    BaseUrl {
        /// Rejected value.
        value: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },
}

impl ClientSettings {
    /// Return the backend origin, falling back to the local default.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BaseUrl`] when the value does not parse.
    pub fn base_url(&self) -> Result<Url, SettingsError> {
        let raw = self
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_BASE_URL);
        Url::parse(raw).map_err(|source| SettingsError::BaseUrl {
            value: raw.to_owned(),
            source,
        })
    }

    /// Return the session file, falling back to `$HOME/.landslide/session_token`.
    pub fn session_file(&self) -> Utf8PathBuf {
        self.session_file
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(
                || {
                    let home = std::env::var("HOME").ok();
                    default_session_path(home.as_deref().map(Utf8Path::new))
                },
                Utf8PathBuf::from,
            )
    }

    /// Return the request timeout, if one is configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Return the identifier fallback base.
    pub fn fallback_landslide_id(&self) -> u64 {
        self.fallback_landslide_id
            .unwrap_or(FALLBACK_LANDSLIDE_ID_BASE)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for client configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 5] = [
        "LANDSLIDE_BASE_URL",
        "LANDSLIDE_SESSION_FILE",
        "LANDSLIDE_REQUEST_TIMEOUT_SECS",
        "LANDSLIDE_FALLBACK_LANDSLIDE_ID",
        "LANDSLIDE_LOG_JSON",
    ];

    fn load_from_empty_args() -> ClientSettings {
        ClientSettings::load_from_iter([OsString::from("landslide")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let mut vars = KEYS.map(|key| (key, None::<String>)).to_vec();
        vars.push(("HOME", Some("/home/ada".to_owned())));
        let _guard = lock_env(vars);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.base_url().expect("default url").as_str(),
            "http://127.0.0.1:8000/"
        );
        assert_eq!(
            settings.session_file(),
            Utf8PathBuf::from("/home/ada/.landslide/session_token")
        );
        assert_eq!(settings.request_timeout(), None);
        assert_eq!(settings.fallback_landslide_id(), 100_089);
        assert!(!settings.log_json);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("LANDSLIDE_BASE_URL", Some("https://landslides.example/api".to_owned())),
            ("LANDSLIDE_SESSION_FILE", Some("/tmp/landslide-token".to_owned())),
            ("LANDSLIDE_REQUEST_TIMEOUT_SECS", Some("15".to_owned())),
            ("LANDSLIDE_FALLBACK_LANDSLIDE_ID", Some("500".to_owned())),
            ("LANDSLIDE_LOG_JSON", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.base_url().expect("url").as_str(),
            "https://landslides.example/api"
        );
        assert_eq!(settings.session_file(), Utf8PathBuf::from("/tmp/landslide-token"));
        assert_eq!(settings.request_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(settings.fallback_landslide_id(), 500);
        assert!(settings.log_json);
    }

    #[rstest]
    #[case("not a url")]
    #[case("/relative/path")]
    fn invalid_base_urls_are_reported(#[case] raw: &str) {
        let settings = ClientSettings {
            base_url: Some(raw.to_owned()),
            ..ClientSettings::default()
        };
        let err = settings.base_url().expect_err("invalid url");
        assert!(err.to_string().contains(raw));
    }

    #[test]
    fn zero_timeout_means_no_timeout() {
        let settings = ClientSettings {
            request_timeout_secs: Some(0),
            ..ClientSettings::default()
        };
        assert_eq!(settings.request_timeout(), None);
    }
}
