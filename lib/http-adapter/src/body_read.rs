use axum::body::Body;
use bytes::{Bytes, BytesMut};
use futures::TryStreamExt;
use http::{header::CONTENT_LENGTH, HeaderMap, StatusCode};

#[derive(Debug, thiserror::Error)]
pub enum ReadBodyStreamError {
    // Thrown while reading the body stream with `try_next()`
    #[error("Failed to read request body: {0}")]
    PayloadReadError(#[from] axum::Error),

    #[error("Content-Length header has invalid value")]
    InvalidContentLengthHeader,

    #[error("Content-Length exceeds the maximum allowed size: {0}")]
    PayloadTooLargeContentLength(usize),

    #[error("Request body exceeds the maximum allowed size while reading the stream")]
    PayloadTooLargeBodyStream,
}

impl ReadBodyStreamError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::PayloadReadError(_) => StatusCode::BAD_REQUEST,
            Self::InvalidContentLengthHeader => StatusCode::BAD_REQUEST,
            Self::PayloadTooLargeContentLength(_) | Self::PayloadTooLargeBodyStream => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
        }
    }
}

#[inline]
pub async fn read_body_stream(
    headers: &HeaderMap,
    body: Body,
    max_size: usize,
) -> Result<Bytes, ReadBodyStreamError> {
    let content_length: Option<usize> = match headers.get(CONTENT_LENGTH) {
        Some(content_length_header) => {
            let content_length: usize = content_length_header
                .to_str()
                .ok()
                .and_then(|value| value.parse().ok())
                .ok_or(ReadBodyStreamError::InvalidContentLengthHeader)?;
            if content_length > max_size {
                return Err(ReadBodyStreamError::PayloadTooLargeContentLength(max_size));
            }
            Some(content_length)
        }
        None => None,
    };

    let mut body_bytes = match content_length {
        Some(content_length) => BytesMut::with_capacity(content_length),
        None => BytesMut::new(),
    };

    let mut body_stream = body.into_data_stream();
    while let Some(chunk) = body_stream.try_next().await? {
        // limit max size of in-memory payload
        if chunk.len() > max_size.saturating_sub(body_bytes.len()) {
            return Err(ReadBodyStreamError::PayloadTooLargeBodyStream);
        }
        body_bytes.extend_from_slice(&chunk);
    }

    Ok(body_bytes.freeze())
}
