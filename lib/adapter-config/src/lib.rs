pub mod executor;
pub mod http_server;
pub mod limits;
pub mod log;
mod env_overrides;

use config::{Config, File, FileFormat, FileSourceFile};
use envconfig::Envconfig;
use serde::Deserialize;
use std::convert::Infallible;

use crate::{
    env_overrides::{EnvVarOverrides, EnvVarOverridesError},
    executor::ExecutorConfig,
    http_server::HttpServerConfig,
    limits::LimitsConfig,
    log::LoggingConfig,
};

#[derive(Debug, Default, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct AdapterConfig {
    /// The logger configuration.
    ///
    /// The server is configured to be mostly silent (`info`) level, and will print only important messages, warnings, and errors.
    #[serde(default)]
    pub log: LoggingConfig,

    /// Configuration for the HTTP server/listener and the GraphQL endpoint path.
    #[serde(default)]
    pub http: HttpServerConfig,

    /// Limits applied to incoming requests before they reach the executor.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Configuration of the upstream GraphQL executor.
    #[serde(default)]
    pub executor: ExecutorConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum AdapterConfigError {
    #[error("Failed to load configuration: {0}")]
    ConfigLoadError(#[from] config::ConfigError),
    #[error("Failed to apply configuration overrides: {0}")]
    EnvVarOverridesError(#[from] EnvVarOverridesError),
    #[error("Failed to load the environment variables: {0}")]
    EnvVarLoadError(#[from] envconfig::Error),
    #[error("Failed to parse the configuration file path: {0}")]
    ConfigPathParseError(Infallible),
    #[error("GraphQL endpoint must start with '/', received: '{0}'")]
    InvalidGraphQLEndpoint(String),
}

static DEFAULT_FILE_NAMES: &[&str] = &[
    "adapter.config.yaml",
    "adapter.config.yml",
    "adapter.config.json",
    "adapter.config.json5",
];

pub fn load_config(
    override_config_path: Option<String>,
) -> Result<AdapterConfig, AdapterConfigError> {
    let env_overrides = EnvVarOverrides::init_from_env()?;
    let mut config = Config::builder();

    if let Some(path_str) = override_config_path {
        let path_buf = path_str
            .parse::<std::path::PathBuf>()
            .map_err(AdapterConfigError::ConfigPathParseError)?;
        let as_file: File<FileSourceFile, _> = path_buf.into();

        config = config.add_source(as_file.required(true));
    } else {
        for name in DEFAULT_FILE_NAMES {
            config = config.add_source(File::with_name(name).required(false));
        }
    }

    config = env_overrides.apply_overrides(config)?;

    let adapter_config = config.build()?.try_deserialize::<AdapterConfig>()?;
    adapter_config.validate()
}

pub fn parse_yaml_config(config_raw: &str) -> Result<AdapterConfig, AdapterConfigError> {
    let adapter_config = Config::builder()
        .add_source(File::from_str(config_raw, FileFormat::Yaml))
        .build()?
        .try_deserialize::<AdapterConfig>()?;

    adapter_config.validate()
}

impl AdapterConfig {
    fn validate(self) -> Result<Self, AdapterConfigError> {
        if !self.http.graphql_endpoint.starts_with('/') {
            return Err(AdapterConfigError::InvalidGraphQLEndpoint(
                self.http.graphql_endpoint,
            ));
        }

        Ok(self)
    }
}
