pub mod mcp_routes;
pub mod summary;

use axum::Router;

use konsulent_core::{ProviderState, QueryState};

/// Build the roster provider's API router.
pub fn provider_router() -> Router<ProviderState> {
    Router::new().nest("/mcp", mcp_routes::router())
}

/// Build the query service's API router.
pub fn query_router() -> Router<QueryState> {
    Router::new().merge(summary::router())
}
