//! GraphQL over HTTP as a [`tower::Layer`].
//!
//! Requests to the configured endpoint are decoded from the query string (GET, or POST
//! with a `query` parameter), from an `application/json` body, or from an
//! `application/graphql` body, executed through a [`GraphQLExecutor`], enriched with an
//! Apollo tracing envelope and written back as `application/json`. Everything else,
//! WebSocket upgrades included, goes to the wrapped service.

pub mod apollo_tracing;
pub mod body_read;
pub mod error;
pub mod executor;
pub mod header;
pub mod layer;
pub mod request;
pub mod response;
pub mod writer;

pub use crate::{
    apollo_tracing::ApolloTracing,
    error::AdapterError,
    executor::{GraphQLExecutor, UserContextBuilder},
    layer::{GraphQLHttpLayer, GraphQLHttpLayerBuilder, GraphQLHttpService},
    request::{GraphQLRequest, RequestShape},
    response::{ExecutionResult, GraphQLError, GraphQLErrorLocation, GraphQLErrorPathSegment},
    writer::{JsonResponseWriter, ResponseWriteError, ResponseWriter},
};
pub use tokio_util::sync::CancellationToken;
