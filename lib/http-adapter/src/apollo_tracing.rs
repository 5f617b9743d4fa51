use std::time::{Duration, Instant, SystemTime};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::response::ExecutionResult;

/// Key of the entry added to `extensions`.
pub const TRACING_EXTENSION_KEY: &str = "tracing";
pub const TRACING_FORMAT_VERSION: u8 = 1;

/// Top-level Apollo tracing envelope. Per-resolver timings are not collected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApolloTracing {
    pub version: u8,
    pub start_time: String,
    pub end_time: String,
    /// Nanoseconds.
    pub duration: u64,
}

impl ApolloTracing {
    fn new(started_at: SystemTime, elapsed: Duration) -> Self {
        let ended_at = started_at + elapsed;

        ApolloTracing {
            version: TRACING_FORMAT_VERSION,
            start_time: humantime::format_rfc3339_millis(started_at).to_string(),
            end_time: humantime::format_rfc3339_millis(ended_at).to_string(),
            duration: u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX),
        }
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Wall-clock start for the timestamps, monotonic clock for the duration.
#[derive(Debug, Clone, Copy)]
pub struct TracingStopwatch {
    started_at: SystemTime,
    started: Instant,
}

impl TracingStopwatch {
    pub fn start() -> Self {
        TracingStopwatch {
            started_at: SystemTime::now(),
            started: Instant::now(),
        }
    }

    pub fn stop(self) -> ApolloTracing {
        ApolloTracing::new(self.started_at, self.started.elapsed())
    }
}

impl ExecutionResult {
    /// Stores the envelope under `extensions.tracing`, replacing any previous entry.
    pub fn enrich_with_apollo_tracing(&mut self, tracing: &ApolloTracing) {
        match tracing.to_value() {
            Ok(value) => self.insert_extension(TRACING_EXTENSION_KEY, value),
            Err(err) => warn!("Failed to serialize Apollo tracing extension: {}", err),
        }
    }
}
