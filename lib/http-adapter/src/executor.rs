use async_trait::async_trait;
use http::request::Parts;
use tokio_util::sync::CancellationToken;

use crate::{request::GraphQLRequest, response::ExecutionResult};

/// Runs GraphQL operations on behalf of the adapter. Parsing, validation and resolution
/// all happen behind this trait.
///
/// `C` is the per-request user context produced by a [`UserContextBuilder`]. The
/// cancellation token fires when the HTTP request is dropped before execution finishes.
#[async_trait]
pub trait GraphQLExecutor<C: Send + 'static = ()>: Send + Sync + 'static {
    async fn execute(
        &self,
        request: GraphQLRequest,
        user_context: Option<C>,
        cancellation_token: CancellationToken,
    ) -> ExecutionResult;
}

/// Builds the user context handed to the executor from the incoming request head.
#[async_trait]
pub trait UserContextBuilder<C: Send + 'static>: Send + Sync + 'static {
    async fn build_user_context(&self, parts: &Parts) -> C;
}
