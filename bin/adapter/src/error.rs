use graphql_http_adapter_config::AdapterConfigError;

use crate::http_executor::HttpExecutorError;

#[derive(Debug, thiserror::Error)]
pub enum ServerInitError {
    #[error(transparent)]
    AdapterConfigError(#[from] AdapterConfigError),
    #[error("Failed to create the upstream executor: {0}")]
    HttpExecutorError(#[from] HttpExecutorError),
    #[error("Failed to bind HTTP server to address: {0}. Error: {1}")]
    HttpServerBindError(String, std::io::Error),
    #[error("Failed to start HTTP server: {0}")]
    HttpServerStartError(std::io::Error),
}
