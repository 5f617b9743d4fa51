use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    Router,
};
use graphql_http_adapter::{
    CancellationToken, ExecutionResult, GraphQLExecutor, GraphQLHttpLayer, GraphQLRequest,
    UserContextBuilder,
};
use http::{request::Parts, HeaderMap, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

pub const NEXT_HANDLER_BODY: &str = "handled by the next service";

/// One call observed by a [`RecordingExecutor`].
#[derive(Debug, Clone)]
pub struct RecordedCall<C> {
    pub request: GraphQLRequest,
    pub user_context: Option<C>,
    pub cancellation_token: CancellationToken,
}

/// Returns a fixed result and remembers every call it receives.
#[derive(Clone)]
pub struct RecordingExecutor<C = ()> {
    result: ExecutionResult,
    calls: Arc<Mutex<Vec<RecordedCall<C>>>>,
}

impl<C> RecordingExecutor<C> {
    pub fn new(result: ExecutionResult) -> Self {
        Self {
            result,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall<C>>
    where
        C: Clone,
    {
        self.calls.lock().expect("calls lock poisoned").clone()
    }

    pub fn single_call(&self) -> RecordedCall<C>
    where
        C: Clone,
    {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one executor call");
        calls.into_iter().next().expect("one call was recorded")
    }
}

#[async_trait]
impl<C: Clone + Send + Sync + 'static> GraphQLExecutor<C> for RecordingExecutor<C> {
    async fn execute(
        &self,
        request: GraphQLRequest,
        user_context: Option<C>,
        cancellation_token: CancellationToken,
    ) -> ExecutionResult {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push(RecordedCall {
                request,
                user_context,
                cancellation_token,
            });

        self.result.clone()
    }
}

/// User context carrying one header, for asserting that contexts reach the executor.
#[derive(Debug, Clone, PartialEq)]
pub struct TenantContext {
    pub tenant: Option<String>,
}

pub struct TenantContextBuilder;

#[async_trait]
impl UserContextBuilder<TenantContext> for TenantContextBuilder {
    async fn build_user_context(&self, parts: &Parts) -> TenantContext {
        TenantContext {
            tenant: parts
                .headers
                .get("x-tenant")
                .and_then(|value| value.to_str().ok())
                .map(str::to_string),
        }
    }
}

/// Wraps `layer` around a fallback service that answers `418` with [`NEXT_HANDLER_BODY`].
pub fn app_with_layer<C: Send + 'static>(layer: GraphQLHttpLayer<C>) -> Router {
    Router::new()
        .fallback(|| async { (StatusCode::IM_A_TEAPOT, NEXT_HANDLER_BODY) })
        .layer(layer)
}

pub fn app_with_executor<C: Clone + Send + Sync + 'static>(
    executor: RecordingExecutor<C>,
) -> Router {
    app_with_layer(GraphQLHttpLayer::<C>::builder(executor).build())
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: bytes::Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        sonic_rs::from_slice(&self.body).expect("response body should be valid JSON")
    }

    /// The JSON body without the `extensions.tracing` entry, which carries wall-clock times.
    pub fn json_without_tracing(&self) -> Value {
        let mut json = self.json();
        let extensions_left_empty =
            match json.get_mut("extensions").and_then(Value::as_object_mut) {
                Some(extensions) => {
                    extensions.remove("tracing");
                    extensions.is_empty()
                }
                None => false,
            };

        if extensions_left_empty {
            if let Some(object) = json.as_object_mut() {
                object.remove("extensions");
            }
        }

        json
    }

    pub fn pretty_json_without_tracing(&self) -> String {
        sonic_rs::to_string_pretty(&self.json_without_tracing())
            .expect("JSON body should be serializable to a pretty string")
    }

    pub fn text(&self) -> &str {
        std::str::from_utf8(&self.body).expect("response body should be valid UTF-8")
    }
}

pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app
        .oneshot(request)
        .await
        .expect("router should not fail");

    let (parts, body) = response.into_parts();
    let body = to_bytes(body, usize::MAX)
        .await
        .expect("response body should be readable");

    TestResponse {
        status: parts.status,
        headers: parts.headers,
        body,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request should build")
}

pub fn post(uri: &str, content_type: Option<&str>, body: impl Into<Body>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    builder.body(body.into()).expect("request should build")
}

pub fn json_post(uri: &str, body: &Value) -> Request<Body> {
    post(
        uri,
        Some("application/json"),
        sonic_rs::to_string(body).expect("body should serialize"),
    )
}
