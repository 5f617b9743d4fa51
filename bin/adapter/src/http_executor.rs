use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use graphql_http_adapter::{
    CancellationToken, ExecutionResult, GraphQLExecutor, GraphQLRequest,
};
use graphql_http_adapter_config::executor::ExecutorConfig;
use http::{header, HeaderMap, HeaderValue, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::Version;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::{TokioExecutor, TokioTimer},
};
use tracing::{debug, warn};

use crate::{http_utils::request_id::REQUEST_ID_HEADER_NAME, user_context::RequestContext};

#[derive(thiserror::Error, Debug, Clone)]
pub enum HttpExecutorError {
    #[error("Failed to parse endpoint \"{0}\" as URI: {1}")]
    EndpointParseFailure(String, String),
    #[error("Failed to serialize GraphQL request: {0}")]
    RequestSerializationFailure(String),
    #[error("Failed to build request: {0}")]
    RequestBuildFailure(String),
    #[error("Failed to send request: {0}")]
    RequestFailure(String),
    #[error("Failed to read response body: {0}")]
    ResponseReadFailure(String),
    #[error("Failed to parse response body: {0}")]
    ResponseParseFailure(String),
    #[error("Upstream responded with status {0}")]
    UnexpectedStatus(StatusCode),
    #[error("Request timed out after {0:?}")]
    RequestTimeout(Duration),
    #[error("Request was cancelled")]
    Cancelled,
}

/// Forwards operations to an upstream GraphQL server over HTTP/1.1.
#[derive(Debug)]
pub struct HttpExecutor {
    endpoint: http::Uri,
    timeout: Duration,
    http_client: Client<HttpConnector, Full<Bytes>>,
    header_map: HeaderMap,
}

impl HttpExecutor {
    pub fn try_new(config: &ExecutorConfig) -> Result<Self, HttpExecutorError> {
        let endpoint = config.endpoint.parse::<http::Uri>().map_err(|e| {
            HttpExecutorError::EndpointParseFailure(config.endpoint.clone(), e.to_string())
        })?;

        let http_client = Client::builder(TokioExecutor::new())
            .pool_timer(TokioTimer::new())
            .build_http();

        let mut header_map = HeaderMap::new();
        header_map.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        header_map.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        header_map.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));

        Ok(Self {
            endpoint,
            timeout: config.timeout,
            http_client,
            header_map,
        })
    }

    async fn send(
        &self,
        request: &GraphQLRequest,
        user_context: Option<&RequestContext>,
    ) -> Result<ExecutionResult, HttpExecutorError> {
        let body = sonic_rs::to_vec(request)
            .map_err(|e| HttpExecutorError::RequestSerializationFailure(e.to_string()))?;

        let mut req = hyper::Request::builder()
            .method(http::Method::POST)
            .uri(&self.endpoint)
            .version(Version::HTTP_11)
            .body(Full::new(Bytes::from(body)))
            .map_err(|e| HttpExecutorError::RequestBuildFailure(e.to_string()))?;

        *req.headers_mut() = self.header_map.clone();
        if let Some(request_id) = user_context.and_then(|ctx| ctx.request_id.as_ref()) {
            req.headers_mut()
                .insert(REQUEST_ID_HEADER_NAME.clone(), request_id.clone());
        }

        let res = self
            .http_client
            .request(req)
            .await
            .map_err(|e| HttpExecutorError::RequestFailure(e.to_string()))?;

        let status = res.status();
        let body = res
            .into_body()
            .collect()
            .await
            .map_err(|e| HttpExecutorError::ResponseReadFailure(e.to_string()))?
            .to_bytes();

        let parsed = sonic_rs::from_slice::<ExecutionResult>(&body);

        // GraphQL servers may answer with a non-2xx status and still carry a GraphQL body.
        if !status.is_success() {
            return match parsed {
                Ok(result) if result.data.is_some() || result.has_errors() => Ok(result),
                _ => Err(HttpExecutorError::UnexpectedStatus(status)),
            };
        }

        parsed.map_err(|e| HttpExecutorError::ResponseParseFailure(e.to_string()))
    }

    async fn execute_with_deadline(
        &self,
        request: &GraphQLRequest,
        user_context: Option<&RequestContext>,
        cancellation_token: &CancellationToken,
    ) -> Result<ExecutionResult, HttpExecutorError> {
        tokio::select! {
            biased;
            _ = cancellation_token.cancelled() => Err(HttpExecutorError::Cancelled),
            result = tokio::time::timeout(self.timeout, self.send(request, user_context)) => {
                result.unwrap_or(Err(HttpExecutorError::RequestTimeout(self.timeout)))
            }
        }
    }
}

#[async_trait]
impl GraphQLExecutor<RequestContext> for HttpExecutor {
    async fn execute(
        &self,
        request: GraphQLRequest,
        user_context: Option<RequestContext>,
        cancellation_token: CancellationToken,
    ) -> ExecutionResult {
        match self
            .execute_with_deadline(&request, user_context.as_ref(), &cancellation_token)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                if matches!(e, HttpExecutorError::Cancelled) {
                    debug!("execution against {} was cancelled", self.endpoint);
                } else {
                    warn!("upstream request to {} failed: {}", self.endpoint, e);
                }

                ExecutionResult::from_error(format!(
                    "Failed to execute request to {}: {}",
                    self.endpoint, e
                ))
            }
        }
    }
}
