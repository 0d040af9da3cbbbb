//! read configuration from a file or the environment

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

use crate::endpoints::PublicEndpoints;
use crate::errors::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.schooladmin.app/api/";
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";
pub const DEFAULT_USER_AGENT: &str = "schooladmin-client-rust/0.1.0";

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_login_route")]
    pub login_route: String,
    #[serde(default)]
    pub session_path: Option<PathBuf>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub public_endpoints: PublicEndpoints,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_login_route() -> String {
    DEFAULT_LOGIN_ROUTE.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            login_route: default_login_route(),
            session_path: None,
            timeout_secs: None,
            user_agent: default_user_agent(),
            public_endpoints: PublicEndpoints::default(),
        }
    }
}

impl Config {
    pub fn from_values(
        base_url: impl Into<String>,
        login_route: Option<String>,
        session_path: Option<PathBuf>,
        timeout_secs: Option<u64>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            login_route: login_route.unwrap_or_else(default_login_route),
            session_path,
            timeout_secs,
            ..Self::default()
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// # ENV Vars
    /// * `SCHOOLADMIN_API_URL` - API origin, defaults to [`DEFAULT_BASE_URL`]
    /// * `SCHOOLADMIN_LOGIN_ROUTE` - route handed to the session observer on teardown
    /// * `SCHOOLADMIN_SESSION_PATH` - persist tokens to this JSON file
    /// * `SCHOOLADMIN_HTTP_TIMEOUT_SECS` - per-request transport timeout
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs = match lookup("SCHOOLADMIN_HTTP_TIMEOUT_SECS") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!(
                    "SCHOOLADMIN_HTTP_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    raw
                ))
            })?),
            None => None,
        };
        let config = Self {
            base_url: lookup("SCHOOLADMIN_API_URL").unwrap_or_else(default_base_url),
            login_route: lookup("SCHOOLADMIN_LOGIN_ROUTE").unwrap_or_else(default_login_route),
            session_path: lookup("SCHOOLADMIN_SESSION_PATH").map(PathBuf::from),
            timeout_secs,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        self.parsed_base_url().map(|_| ())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Resolves an API-relative path against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.trim_end_matches('/');
        let joined = format!("{}/{}", base, path.trim_start_matches('/'));
        Url::parse(&joined)
            .map_err(|e| Error::Config(format!("Invalid endpoint URL '{}': {}", joined, e)))
    }

    fn parsed_base_url(&self) -> Result<Url, Error> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            Error::Config(format!("Invalid base URL '{}': {}", self.base_url, e))
        })?;
        if url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "Invalid base URL '{}': not a hierarchical URL",
                self.base_url
            )));
        }
        Ok(url)
    }
}
