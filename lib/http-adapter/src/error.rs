use std::string::FromUtf8Error;

use http::StatusCode;

use crate::{body_read::ReadBodyStreamError, response::ExecutionResult};

/// Adapter-level failures. They short-circuit before the executor is called and are
/// answered with a single GraphQL error.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("Invalid 'Content-Type' header: value '{0}' could not be parsed.")]
    InvalidContentTypeHeader(String),
    #[error("Invalid 'Content-Type' header: non-supported media type. Must be of 'application/json' or 'application/graphql'.")]
    UnsupportedMediaType,
    #[error("Failed to parse GraphQL request payload")]
    FailedToParseBody(sonic_rs::Error),
    #[error("Failed to parse GraphQL variables JSON")]
    FailedToParseVariables(sonic_rs::Error),
    #[error("Request body is not valid UTF-8")]
    InvalidBodyEncoding(FromUtf8Error),
    #[error(transparent)]
    ReadBodyStream(#[from] ReadBodyStreamError),
}

impl AdapterError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ReadBodyStream(err) => err.status_code(),
            Self::InvalidContentTypeHeader(_)
            | Self::UnsupportedMediaType
            | Self::FailedToParseBody(_)
            | Self::FailedToParseVariables(_)
            | Self::InvalidBodyEncoding(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn to_execution_result(&self) -> ExecutionResult {
        ExecutionResult::from_error(self.to_string())
    }
}
