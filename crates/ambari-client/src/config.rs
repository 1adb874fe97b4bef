//! Client configuration types.
//!
//! This module defines the connection settings, timeouts and read retry policy
//! used by [`AmbariClient`](crate::AmbariClient).

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ClientError, Result};

/// Configuration for connecting to an Ambari server.
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    /// URL scheme, `http` or `https`.
    #[serde(default = "ClientConfig::default_scheme")]
    pub scheme: String,

    /// Host name of the Ambari server.
    #[serde(default = "ClientConfig::default_host")]
    pub host: String,

    /// Port of the Ambari server.
    #[serde(default = "ClientConfig::default_port")]
    pub port: u16,

    /// User for HTTP Basic authentication, also sent as `X-Requested-By`.
    #[serde(default = "ClientConfig::default_username")]
    pub username: String,

    /// Password for HTTP Basic authentication.
    #[serde(default = "ClientConfig::default_password")]
    pub password: String,

    /// Request timeout in seconds.
    #[serde(default = "ClientConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Connect timeout in seconds.
    #[serde(default = "ClientConfig::default_connect_timeout")]
    pub connect_timeout_seconds: u64,

    /// Retry policy for read requests.
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl ClientConfig {
    fn default_scheme() -> String {
        "http".to_string()
    }

    fn default_host() -> String {
        "localhost".to_string()
    }

    const fn default_port() -> u16 {
        8080
    }

    fn default_username() -> String {
        "admin".to_string()
    }

    fn default_password() -> String {
        "admin".to_string()
    }

    const fn default_request_timeout() -> u64 {
        30
    }

    const fn default_connect_timeout() -> u64 {
        5
    }

    /// Create a configuration for the given server and credentials.
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Load a configuration from a YAML file.
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("failed to read {}: {e}", path.display())))?;
        serde_yaml::from_str(&raw)
            .map_err(|e| ClientError::Config(format!("invalid config {}: {e}", path.display())))
    }

    /// Root URL of the management API, ending in `/api/v1/`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}/api/v1/", self.scheme, self.host, self.port)
    }

    /// Get the request timeout as a `Duration`.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Get the connect timeout as a `Duration`.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            scheme: Self::default_scheme(),
            host: Self::default_host(),
            port: Self::default_port(),
            username: Self::default_username(),
            password: Self::default_password(),
            request_timeout_seconds: Self::default_request_timeout(),
            connect_timeout_seconds: Self::default_connect_timeout(),
            retry: RetryPolicy::default(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("scheme", &self.scheme)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("connect_timeout_seconds", &self.connect_timeout_seconds)
            .field("retry", &self.retry)
            .finish()
    }
}

/// Bounded retry for idempotent reads.
///
/// Only GET requests are retried. Creates, deletes and state changes are sent
/// exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first. Values below 1 count as 1.
    #[serde(default = "RetryPolicy::default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between attempts in milliseconds.
    #[serde(default = "RetryPolicy::default_delay")]
    pub delay_millis: u64,
}

impl RetryPolicy {
    const fn default_max_attempts() -> u32 {
        1
    }

    const fn default_delay() -> u64 {
        500
    }

    /// A policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            delay_millis: Self::default_delay(),
        }
    }

    /// A policy that makes up to `max_attempts` attempts, `delay` apart.
    #[must_use]
    pub const fn bounded(max_attempts: u32, delay: Duration) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let delay_millis = delay.as_millis() as u64;
        Self {
            max_attempts,
            delay_millis,
        }
    }

    /// Number of attempts to make, never less than one.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        if self.max_attempts == 0 {
            1
        } else {
            self.max_attempts
        }
    }

    /// Get the delay between attempts as a `Duration`.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_millis)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}
