//! Store selection configuration.
//!
//! # Responsibility
//! - Describe which store backs a session and for which user.
//! - Validate endpoint/path settings before any store is opened.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

/// User id sent when none is configured.
pub const DEFAULT_USER_ID: &str = "1";
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyUserId,
    InvalidUrl(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUserId => write!(f, "user id cannot be empty"),
            Self::InvalidUrl(value) => {
                write!(f, "endpoint must be an http(s) URL, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Remote endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub tasks_url: String,
    pub user_url: String,
    pub timeout: Duration,
}

impl RemoteConfig {
    pub fn new(tasks_url: impl Into<String>, user_url: impl Into<String>) -> Self {
        Self {
            tasks_url: tasks_url.into(),
            user_url: user_url.into(),
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for url in [&self.tasks_url, &self.user_url] {
            let trimmed = url.trim();
            if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl(trimmed.to_string()));
            }
        }
        Ok(())
    }
}

/// Which store implementation a session talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Local SQLite store; `None` keeps everything in memory.
    Local { db_path: Option<PathBuf> },
    Remote(RemoteConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub user_id: String,
    pub backend: StoreBackend,
}

impl StoreConfig {
    /// Builds a validated config; the user id is trimmed.
    pub fn new(user_id: &str, backend: StoreBackend) -> Result<Self, ConfigError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(ConfigError::EmptyUserId);
        }
        if let StoreBackend::Remote(remote) = &backend {
            remote.validate()?;
        }
        Ok(Self {
            user_id: user_id.to_string(),
            backend,
        })
    }

    /// Short backend label for logs.
    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            StoreBackend::Local { db_path: Some(_) } => "sqlite",
            StoreBackend::Local { db_path: None } => "memory",
            StoreBackend::Remote(_) => "http",
        }
    }
}
