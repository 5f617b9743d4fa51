use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use axum::body::Body;
use bytes::Bytes;
use http::{header::CONTENT_TYPE, request::Parts, Request, Response, StatusCode};
use tokio_util::sync::CancellationToken;
use tower::{Layer, Service};
use tracing::{debug, error, trace, warn};

use crate::{
    apollo_tracing::TracingStopwatch,
    body_read::read_body_stream,
    error::AdapterError,
    executor::{GraphQLExecutor, UserContextBuilder},
    header::{is_websocket_upgrade, path_matches_endpoint, APPLICATION_JSON_HEADER_VALUE},
    request::{GraphQLRequest, RequestShape},
    response::ExecutionResult,
    writer::{JsonResponseWriter, ResponseWriter},
};

pub const DEFAULT_GRAPHQL_ENDPOINT: &str = "/graphql";
/// 2 MiB, like Axum's default
pub const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 2 * 1024 * 1024;

static RESPONSE_WRITE_FAILED_BODY: &[u8] =
    br#"{"errors":[{"message":"Failed to serialize GraphQL response"}]}"#;

struct AdapterState<C: Send + 'static> {
    endpoint: String,
    max_request_body_size: usize,
    executor: Arc<dyn GraphQLExecutor<C>>,
    user_context_builder: Option<Arc<dyn UserContextBuilder<C>>>,
    response_writer: Arc<dyn ResponseWriter>,
}

/// Serves GraphQL over HTTP on one endpoint and hands every other request to the wrapped
/// service untouched.
pub struct GraphQLHttpLayer<C: Send + 'static = ()> {
    state: Arc<AdapterState<C>>,
}

impl<C: Send + 'static> Clone for GraphQLHttpLayer<C> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<C: Send + 'static> GraphQLHttpLayer<C> {
    pub fn builder(executor: impl GraphQLExecutor<C>) -> GraphQLHttpLayerBuilder<C> {
        GraphQLHttpLayerBuilder {
            endpoint: DEFAULT_GRAPHQL_ENDPOINT.to_string(),
            max_request_body_size: DEFAULT_MAX_REQUEST_BODY_SIZE,
            executor: Arc::new(executor),
            user_context_builder: None,
            response_writer: Arc::new(JsonResponseWriter::default()),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.state.endpoint
    }
}

pub struct GraphQLHttpLayerBuilder<C: Send + 'static> {
    endpoint: String,
    max_request_body_size: usize,
    executor: Arc<dyn GraphQLExecutor<C>>,
    user_context_builder: Option<Arc<dyn UserContextBuilder<C>>>,
    response_writer: Arc<dyn ResponseWriter>,
}

impl<C: Send + 'static> GraphQLHttpLayerBuilder<C> {
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn max_request_body_size(mut self, max_request_body_size: usize) -> Self {
        self.max_request_body_size = max_request_body_size;
        self
    }

    pub fn user_context_builder(mut self, builder: impl UserContextBuilder<C>) -> Self {
        self.user_context_builder = Some(Arc::new(builder));
        self
    }

    pub fn response_writer(mut self, writer: impl ResponseWriter) -> Self {
        self.response_writer = Arc::new(writer);
        self
    }

    pub fn build(self) -> GraphQLHttpLayer<C> {
        GraphQLHttpLayer {
            state: Arc::new(AdapterState {
                endpoint: self.endpoint,
                max_request_body_size: self.max_request_body_size,
                executor: self.executor,
                user_context_builder: self.user_context_builder,
                response_writer: self.response_writer,
            }),
        }
    }
}

impl<S, C: Send + 'static> Layer<S> for GraphQLHttpLayer<C> {
    type Service = GraphQLHttpService<S, C>;

    fn layer(&self, inner: S) -> Self::Service {
        GraphQLHttpService {
            inner,
            state: self.state.clone(),
        }
    }
}

pub struct GraphQLHttpService<S, C: Send + 'static = ()> {
    inner: S,
    state: Arc<AdapterState<C>>,
}

impl<S: Clone, C: Send + 'static> Clone for GraphQLHttpService<S, C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            state: self.state.clone(),
        }
    }
}

impl<S, C> Service<Request<Body>> for GraphQLHttpService<S, C>
where
    S: Service<Request<Body>, Response = Response<Body>> + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    C: Send + 'static,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        if !self.state.should_handle(&req) {
            trace!(
                "passing {} {} through to the next handler",
                req.method(),
                req.uri().path()
            );

            return Box::pin(self.inner.call(req));
        }

        let state = self.state.clone();
        Box::pin(async move { Ok(state.handle(req).await) })
    }
}

impl<C: Send + 'static> AdapterState<C> {
    fn should_handle(&self, req: &Request<Body>) -> bool {
        path_matches_endpoint(req.uri().path(), &self.endpoint)
            && !is_websocket_upgrade(req.method(), req.headers())
    }

    async fn handle(&self, req: Request<Body>) -> Response<Body> {
        let (parts, body) = req.into_parts();

        let graphql_request = match self.extract_graphql_request(&parts, body).await {
            Ok(graphql_request) => graphql_request,
            Err(err) => {
                warn!(
                    "rejecting GraphQL request to {}: {}",
                    parts.uri.path(),
                    err
                );
                debug!("{:?}", err);

                return self.write_response(err.status_code(), &err.to_execution_result());
            }
        };

        let user_context = match &self.user_context_builder {
            Some(builder) => Some(builder.build_user_context(&parts).await),
            None => None,
        };

        let cancellation_token = CancellationToken::new();
        // Fires if this future is dropped while the executor is still running.
        let cancel_on_drop = cancellation_token.clone().drop_guard();

        let stopwatch = TracingStopwatch::start();
        let mut result = self
            .executor
            .execute(graphql_request, user_context, cancellation_token)
            .await;
        let apollo_tracing = stopwatch.stop();
        let _ = cancel_on_drop.disarm();

        result.enrich_with_apollo_tracing(&apollo_tracing);

        if result.has_errors() {
            let messages: Vec<&str> = result
                .errors
                .iter()
                .flatten()
                .map(|e| e.message.as_str())
                .collect();
            error!("GraphQL execution error(s): {}", messages.join("; "));
        }

        self.write_response(StatusCode::OK, &result)
    }

    async fn extract_graphql_request(
        &self,
        parts: &Parts,
        body: Body,
    ) -> Result<GraphQLRequest, AdapterError> {
        match RequestShape::detect(parts)? {
            RequestShape::QueryString(query_string) => {
                GraphQLRequest::from_query_string(query_string)
            }
            RequestShape::Json => {
                let body_bytes =
                    read_body_stream(&parts.headers, body, self.max_request_body_size).await?;
                GraphQLRequest::from_json_slice(&body_bytes)
            }
            RequestShape::GraphQL => {
                let body_bytes =
                    read_body_stream(&parts.headers, body, self.max_request_body_size).await?;
                let query = String::from_utf8(body_bytes.to_vec())
                    .map_err(AdapterError::InvalidBodyEncoding)?;
                Ok(GraphQLRequest::from_query(query))
            }
            RequestShape::Empty => Ok(GraphQLRequest::default()),
        }
    }

    fn write_response(&self, status: StatusCode, result: &ExecutionResult) -> Response<Body> {
        let (status, body) = match self.response_writer.write(result) {
            Ok(body) => (status, body),
            Err(err) => {
                error!("{}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Bytes::from_static(RESPONSE_WRITE_FAILED_BODY),
                )
            }
        };

        let mut response = Response::new(Body::from(body));
        *response.status_mut() = status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, APPLICATION_JSON_HEADER_VALUE.clone());
        response
    }
}
