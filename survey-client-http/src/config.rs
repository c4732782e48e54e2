use std::env;
use std::path::PathBuf;
use std::time::Duration;

use dotenvy::dotenv;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Error type for configuration loading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },
}

/// Where the API lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL, without a trailing slash.
    pub api_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Override for the sign-in record location.
    pub auth_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: normalize_url(api_url.into()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            auth_file: None,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = normalize_url(api_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_auth_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.auth_file = Some(path.into());
        self
    }

    /// Read `SURVEY_API_URL`, `SURVEY_API_TIMEOUT_SECS` and `SURVEY_AUTH_FILE`,
    /// honouring a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) but reads variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup("SURVEY_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout = match lookup("SURVEY_API_TIMEOUT_SECS") {
            None => DEFAULT_TIMEOUT_SECS,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "SURVEY_API_TIMEOUT_SECS",
                        value: raw,
                    });
                }
            },
        };

        Ok(Self {
            api_url: normalize_url(api_url),
            timeout: Duration::from_secs(timeout),
            auth_file: lookup("SURVEY_AUTH_FILE").map(PathBuf::from),
        })
    }
}

fn normalize_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
