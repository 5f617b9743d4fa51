mod error;
pub mod http_executor;
mod http_utils;
mod logger;
pub mod user_context;

pub use crate::error::ServerInitError;

use axum::{body::Body, routing::get, Router};
use graphql_http_adapter::GraphQLHttpLayer;
use graphql_http_adapter_config::{load_config, AdapterConfig};
use http::Request;
use tokio::{net::TcpListener, signal};
use tower_http::{
    request_id::{PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{debug_span, error, info};

use crate::{
    http_executor::HttpExecutor,
    http_utils::{
        probes::{health_check_handler, not_found_handler},
        request_id::{RequestIdGenerator, REQUEST_ID_HEADER_NAME},
    },
    logger::configure_logging,
    user_context::{RequestContext, RequestContextBuilder},
};

pub async fn adapter_entrypoint() -> Result<(), ServerInitError> {
    let config_path = std::env::var("ADAPTER_CONFIG_FILE_PATH").ok();
    let adapter_config = load_config(config_path)?;
    configure_logging(&adapter_config.log);

    let app = build_app(&adapter_config)?;

    let addr = adapter_config.http.address();
    info!(
        "Starting server on {}, serving GraphQL on {}, forwarding to {}",
        addr, adapter_config.http.graphql_endpoint, adapter_config.executor.endpoint
    );

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|err| ServerInitError::HttpServerBindError(addr.clone(), err))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerInitError::HttpServerStartError)?;

    info!("Server stopped");

    Ok(())
}

/// Assembles the HTTP application: the GraphQL adapter on the configured endpoint, a
/// health probe, and request-id and tracing middleware around both.
pub fn build_app(adapter_config: &AdapterConfig) -> Result<Router, ServerInitError> {
    let executor = HttpExecutor::try_new(&adapter_config.executor)?;

    let graphql_layer = GraphQLHttpLayer::<RequestContext>::builder(executor)
        .endpoint(adapter_config.http.graphql_endpoint.as_str())
        .max_request_body_size(adapter_config.limits.max_request_body_size)
        .user_context_builder(RequestContextBuilder)
        .build();

    let app = Router::new()
        .route("/health", get(health_check_handler))
        .fallback(not_found_handler)
        .layer(graphql_layer)
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER_NAME.clone()))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .extensions()
                    .get::<RequestId>()
                    .and_then(|id| id.header_value().to_str().ok())
                    .unwrap_or_default();

                debug_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(SetRequestIdLayer::new(
            REQUEST_ID_HEADER_NAME.clone(),
            RequestIdGenerator,
        ));

    Ok(app)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
