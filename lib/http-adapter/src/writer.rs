use bytes::Bytes;

use crate::response::ExecutionResult;

#[derive(Debug, thiserror::Error)]
#[error("Failed to serialize GraphQL response: {0}")]
pub struct ResponseWriteError(#[source] pub Box<dyn std::error::Error + Send + Sync>);

impl From<sonic_rs::Error> for ResponseWriteError {
    fn from(err: sonic_rs::Error) -> Self {
        ResponseWriteError(Box::new(err))
    }
}

/// Serializes an [`ExecutionResult`] into the HTTP response body.
pub trait ResponseWriter: Send + Sync + 'static {
    fn write(&self, result: &ExecutionResult) -> Result<Bytes, ResponseWriteError>;
}

/// Default writer: compact JSON, or indented when built with [`JsonResponseWriter::indented`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonResponseWriter {
    indented: bool,
}

impl JsonResponseWriter {
    pub fn indented() -> Self {
        Self { indented: true }
    }
}

impl ResponseWriter for JsonResponseWriter {
    fn write(&self, result: &ExecutionResult) -> Result<Bytes, ResponseWriteError> {
        if self.indented {
            Ok(Bytes::from(sonic_rs::to_string_pretty(result)?))
        } else {
            Ok(Bytes::from(sonic_rs::to_vec(result)?))
        }
    }
}
