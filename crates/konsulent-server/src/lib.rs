//! Konsulent Server - HTTP adapters for the consultant availability service.
//!
//! Two server roles live in this crate:
//! - the roster provider, an MCP Streamable HTTP server exposing the roster
//!   through the `hent_konsulenter` tool
//! - the query service, a REST endpoint that fetches the roster over MCP,
//!   filters it, and answers with an LLM-written Norwegian summary
//!
//! Each role can be started from its config, or via the `*_with_state`
//! variant when the caller needs to share or pre-build the state (tests,
//! embedding). Tracing subscription is left to the binary.

pub mod api;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use konsulent_core::mcp::RosterClient;
use konsulent_core::roster::Roster;
use konsulent_core::state::{ProviderStateInner, QueryStateInner};
use konsulent_core::summary::{Summarizer, SummarizerConfig};
use konsulent_core::{ProviderState, QueryState};

/// Configuration for the roster provider server.
pub struct ProviderConfig {
    pub host: String,
    pub port: u16,
    /// Optional YAML roster file. The built-in roster is served when unset.
    pub roster_path: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4100,
            roster_path: None,
        }
    }
}

/// Configuration for the query service.
pub struct QueryConfig {
    pub host: String,
    pub port: u16,
    /// Base URL of the roster provider; the MCP endpoint is at `{url}/mcp`.
    pub provider_url: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4000,
            provider_url: "http://127.0.0.1:4100".to_string(),
        }
    }
}

/// Create provider state from an optional roster file path.
pub fn create_provider_state(roster_path: Option<&str>) -> Result<ProviderState, String> {
    let roster = match roster_path {
        Some(path) => Roster::from_yaml_file(path)?,
        None => Roster::builtin(),
    };
    Ok(Arc::new(ProviderStateInner::new(roster)))
}

/// Create query-service state.
///
/// Reads the LLM credentials from the environment, so a missing
/// `OPENROUTER_API_KEY` fails here, before the server starts serving.
pub fn create_query_state(provider_url: &str) -> Result<QueryState, String> {
    let config = SummarizerConfig::from_env().map_err(|e| e.to_string())?;
    let roster_client = RosterClient::new(provider_url);
    let summarizer = Summarizer::new(config);
    Ok(Arc::new(QueryStateInner::new(roster_client, summarizer)))
}

/// Start the roster provider server.
///
/// Returns the actual address the server is listening on.
pub async fn start_provider_server(config: ProviderConfig) -> Result<SocketAddr, String> {
    tracing::info!(
        "Starting roster provider on {}:{}",
        config.host,
        config.port
    );

    let state = create_provider_state(config.roster_path.as_deref())?;

    start_provider_with_state(config, state).await
}

/// Start the roster provider with a pre-built `ProviderState`.
///
/// Only `host` and `port` are read from the config here; the roster served
/// is the one carried by the state, not `roster_path`.
pub async fn start_provider_with_state(
    config: ProviderConfig,
    state: ProviderState,
) -> Result<SocketAddr, String> {
    let app = Router::new()
        .merge(api::provider_router())
        .route("/health", axum::routing::get(provider_health))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let local_addr = serve(&config.host, config.port, app).await?;
    tracing::info!("Roster provider listening on {}", local_addr);
    Ok(local_addr)
}

/// Start the query service.
///
/// Returns the actual address the server is listening on.
pub async fn start_query_server(config: QueryConfig) -> Result<SocketAddr, String> {
    tracing::info!(
        "Starting query service on {}:{} (provider: {})",
        config.host,
        config.port,
        config.provider_url
    );

    let state = create_query_state(&config.provider_url)?;

    start_query_with_state(config, state).await
}

/// Start the query service with a pre-built `QueryState`.
///
/// Only `host` and `port` are read from the config here; the provider
/// queried is the one baked into the state's roster client, not
/// `provider_url`.
pub async fn start_query_with_state(
    config: QueryConfig,
    state: QueryState,
) -> Result<SocketAddr, String> {
    let app = Router::new()
        .merge(api::query_router())
        .route("/health", axum::routing::get(query_health))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let local_addr = serve(&config.host, config.port, app).await?;
    tracing::info!("Query service listening on {}", local_addr);
    Ok(local_addr)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Bind and serve in a background task, returning the bound address.
async fn serve(host: &str, port: u16, app: Router) -> Result<SocketAddr, String> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| format!("Invalid address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    let local_addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get local address: {}", e))?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok(local_addr)
}

async fn provider_health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "type": "MCP Server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn query_health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "type": "MCP Client",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
