use async_trait::async_trait;
use graphql_http_adapter::UserContextBuilder;
use http::{request::Parts, HeaderValue};
use tower_http::request_id::RequestId;

use crate::http_utils::request_id::REQUEST_ID_HEADER_NAME;

/// Per-request data forwarded to the upstream executor.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub request_id: Option<HeaderValue>,
}

#[derive(Debug, Clone, Default)]
pub struct RequestContextBuilder;

#[async_trait]
impl UserContextBuilder<RequestContext> for RequestContextBuilder {
    async fn build_user_context(&self, parts: &Parts) -> RequestContext {
        let request_id = parts
            .extensions
            .get::<RequestId>()
            .map(|id| id.header_value().clone())
            .or_else(|| parts.headers.get(&REQUEST_ID_HEADER_NAME).cloned());

        RequestContext { request_id }
    }
}
