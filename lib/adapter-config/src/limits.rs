use human_size::Size;
use serde::{de, Deserialize, Deserializer};

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum size of a request body the adapter reads into memory, in human readable
    /// form (for example `512 KiB` or `2 MiB`).
    ///
    /// Larger bodies are rejected with `413 Payload Too Large`.
    #[serde(
        default = "default_max_request_body_size",
        deserialize_with = "deserialize_byte_size"
    )]
    pub max_request_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_request_body_size: default_max_request_body_size(),
        }
    }
}

/// 2 MiB.
fn default_max_request_body_size() -> usize {
    2 * 1024 * 1024
}

fn deserialize_byte_size<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse::<Size>()
        .map(|size| size.to_bytes() as usize)
        .map_err(|err| de::Error::custom(format!("Invalid size '{raw}': {err}")))
}
