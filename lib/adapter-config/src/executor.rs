use std::time::Duration;

use serde::Deserialize;

/// Upstream GraphQL server the adapter forwards operations to.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ExecutorConfig {
    /// URL of the upstream GraphQL endpoint. Only plain `http://` endpoints are supported.
    ///
    /// Can also be set via the `EXECUTOR_ENDPOINT` environment variable.
    #[serde(default = "default_executor_endpoint")]
    pub endpoint: String,

    /// Maximum time to wait for the upstream to answer, e.g. `30s` or `1m 30s`.
    #[serde(
        default = "default_executor_timeout",
        deserialize_with = "humantime_serde::deserialize"
    )]
    pub timeout: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_executor_endpoint(),
            timeout: default_executor_timeout(),
        }
    }
}

fn default_executor_endpoint() -> String {
    "http://127.0.0.1:4001/graphql".to_string()
}

fn default_executor_timeout() -> Duration {
    Duration::from_secs(30)
}
