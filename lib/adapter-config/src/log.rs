use std::str::FromStr;

use serde::Deserialize;

/// Logger settings. `LOG_LEVEL`, `LOG_FORMAT` and `LOG_FILTER` override the matching fields.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields, default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    /// `EnvFilter` directives, used instead of `level` when set.
    pub filter: Option<String>,
}

impl LoggingConfig {
    pub fn env_filter_str(&self) -> &str {
        self.filter.as_deref().unwrap_or(self.level.as_str())
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "String")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

const LOG_LEVELS: [(LogLevel, &str); 5] = [
    (LogLevel::Trace, "trace"),
    (LogLevel::Debug, "debug"),
    (LogLevel::Info, "info"),
    (LogLevel::Warn, "warn"),
    (LogLevel::Error, "error"),
];

/// `pretty-tree` and `pretty-compact` are meant for terminals, `json` for log collectors.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "String")]
pub enum LogFormat {
    PrettyTree,
    PrettyCompact,
    Json,
}

const LOG_FORMATS: [(LogFormat, &str); 3] = [
    (LogFormat::PrettyTree, "pretty-tree"),
    (LogFormat::PrettyCompact, "pretty-compact"),
    (LogFormat::Json, "json"),
];

fn name_of<T: Copy + PartialEq>(table: &[(T, &'static str)], value: T) -> &'static str {
    table
        .iter()
        .find(|(candidate, _)| *candidate == value)
        .map(|(_, name)| *name)
        .unwrap_or_default()
}

fn parse_name<T: Copy>(table: &[(T, &'static str)], raw: &str, kind: &str) -> Result<T, String> {
    table
        .iter()
        .find(|(_, name)| name.eq_ignore_ascii_case(raw.trim()))
        .map(|(value, _)| *value)
        .ok_or_else(|| format!("Invalid log {kind}: '{raw}'"))
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        name_of(&LOG_LEVELS, self)
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            LogLevel::Debug
        } else {
            LogLevel::Info
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_name(&LOG_LEVELS, s, "level")
    }
}

impl TryFrom<String> for LogLevel {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, <Self as TryFrom<String>>::Error> {
        raw.parse()
    }
}

impl LogFormat {
    pub fn as_str(self) -> &'static str {
        name_of(&LOG_FORMATS, self)
    }
}

impl Default for LogFormat {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            LogFormat::PrettyCompact
        } else {
            LogFormat::Json
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_name(&LOG_FORMATS, s, "format")
    }
}

impl TryFrom<String> for LogFormat {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}
