//! Client configuration.
//!
//! The base endpoint and timeouts are fixed for the lifetime of a client and
//! passed in at construction, so tests can point a client at a local server.

use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_LIST_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the catalog lives and how long each call may take.
///
/// Deserializes from a host application's settings with timeouts given in
/// whole seconds:
///
/// ```json
/// { "base_url": "https://inventario.example/api", "list_timeout_secs": 20 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Origin plus path prefix, e.g. `http://10.0.2.2:5000/api`.
    pub base_url: String,
    #[serde(rename = "list_timeout_secs", with = "secs")]
    pub list_timeout: Duration,
    /// Timeout for get, create, update and delete.
    #[serde(rename = "request_timeout_secs", with = "secs")]
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_list_timeout(mut self, timeout: Duration) -> Self {
        self.list_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            list_timeout: DEFAULT_LIST_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
