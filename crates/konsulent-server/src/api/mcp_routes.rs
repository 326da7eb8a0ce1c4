//! MCP Streamable HTTP API - /mcp
//!
//! POST   /mcp - JSON-RPC messages (initialize, tools/list, tools/call)
//! GET    /mcp - SSE stream for server-initiated messages
//! DELETE /mcp - Terminate an MCP session
//!
//! Implements the MCP Streamable HTTP transport. The provider exposes a
//! single tool, `hent_konsulenter`, which returns the full roster as
//! pretty-printed JSON text.

use axum::{
    extract::State,
    http::HeaderMap,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Json, Router,
};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_stream::StreamExt as _;

use konsulent_core::mcp::types::{
    INVALID_REQUEST, MCP_PROTOCOL_VERSION, MCP_SESSION_HEADER, METHOD_NOT_FOUND,
    TOOL_HENT_KONSULENTER,
};
use konsulent_core::{ProviderState, ServerError};

/// In-memory session store for MCP sessions.
type McpSessions = Arc<RwLock<HashMap<String, McpSessionData>>>;

struct McpSessionData {
    #[allow(dead_code)]
    protocol_version: String,
}

pub fn router() -> Router<ProviderState> {
    let sessions: McpSessions = Arc::new(RwLock::new(HashMap::new()));

    Router::new().route(
        "/",
        get({
            let sessions = sessions.clone();
            move |headers, state| mcp_get(headers, state, sessions)
        })
        .post({
            let sessions = sessions.clone();
            move |headers, state, body| mcp_post(headers, state, body, sessions)
        })
        .delete({
            let sessions = sessions.clone();
            move |headers, state| mcp_delete(headers, state, sessions)
        }),
    )
}

// ─── POST /mcp ────────────────────────────────────────────────────────

async fn mcp_post(
    headers: HeaderMap,
    State(state): State<ProviderState>,
    Json(body): Json<serde_json::Value>,
    sessions: McpSessions,
) -> Result<(HeaderMap, Json<serde_json::Value>), ServerError> {
    let session_id = headers
        .get(MCP_SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let method = body.get("method").and_then(|m| m.as_str()).unwrap_or("");
    let id = body.get("id").cloned().unwrap_or(serde_json::json!(null));
    let params = body.get("params").cloned().unwrap_or_default();

    tracing::info!(
        "[MCP Route] POST: method={}, session={:?}",
        method,
        session_id
    );

    let mut response_headers = HeaderMap::new();
    response_headers.insert("access-control-allow-origin", "*".parse().unwrap());
    response_headers.insert(
        "access-control-expose-headers",
        "Mcp-Session-Id, MCP-Protocol-Version".parse().unwrap(),
    );

    match method {
        "initialize" => {
            let new_session_id = uuid::Uuid::new_v4().to_string();
            let protocol_version = params
                .get("protocolVersion")
                .and_then(|v| v.as_str())
                .unwrap_or(MCP_PROTOCOL_VERSION);

            sessions.write().await.insert(
                new_session_id.clone(),
                McpSessionData {
                    protocol_version: protocol_version.to_string(),
                },
            );

            response_headers.insert(MCP_SESSION_HEADER, new_session_id.parse().unwrap());

            let active_count = sessions.read().await.len();
            tracing::info!(
                "[MCP Route] Session created: {} (active: {})",
                new_session_id,
                active_count
            );

            Ok((
                response_headers,
                Json(serde_json::json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": {
                        "protocolVersion": protocol_version,
                        "capabilities": {
                            "tools": { "listChanged": false }
                        },
                        "serverInfo": {
                            "name": "konsulent-mcp",
                            "version": env!("CARGO_PKG_VERSION")
                        }
                    }
                })),
            ))
        }

        "tools/list" => Ok((
            response_headers,
            Json(serde_json::json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": { "tools": build_tool_list() }
            })),
        )),

        "tools/call" => {
            let tool_name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
            let result = execute_tool(&state, tool_name);

            Ok((
                response_headers,
                Json(serde_json::json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": result
                })),
            ))
        }

        "notifications/initialized" => {
            // Client confirms initialization, no reply payload needed
            Ok((
                response_headers,
                Json(serde_json::json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": {}
                })),
            ))
        }

        _ => Ok((
            response_headers,
            Json(serde_json::json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": {
                    "code": METHOD_NOT_FOUND,
                    "message": format!("Method not found: {}", method)
                }
            })),
        )),
    }
}

// ─── GET /mcp (SSE) ──────────────────────────────────────────────────

async fn mcp_get(
    headers: HeaderMap,
    State(_state): State<ProviderState>,
    sessions: McpSessions,
) -> Result<
    Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>,
    (axum::http::StatusCode, Json<serde_json::Value>),
> {
    let session_id = headers.get(MCP_SESSION_HEADER).and_then(|v| v.to_str().ok());

    if session_id.is_none() || !sessions.read().await.contains_key(session_id.unwrap_or("")) {
        return Err((
            axum::http::StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "jsonrpc": "2.0",
                "error": {
                    "code": INVALID_REQUEST,
                    "message": "No active session. Send an initialize POST request first."
                }
            })),
        ));
    }

    let heartbeat = tokio_stream::wrappers::IntervalStream::new(tokio::time::interval(
        std::time::Duration::from_secs(30),
    ))
    .map(|_| Ok(Event::default().comment("heartbeat")));

    Ok(Sse::new(heartbeat).keep_alive(KeepAlive::default()))
}

// ─── DELETE /mcp ──────────────────────────────────────────────────────

async fn mcp_delete(
    headers: HeaderMap,
    State(_state): State<ProviderState>,
    sessions: McpSessions,
) -> Result<axum::http::StatusCode, ServerError> {
    let session_id = headers
        .get(MCP_SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    if let Some(sid) = session_id {
        let mut store = sessions.write().await;
        if store.remove(&sid).is_some() {
            tracing::info!(
                "[MCP Route] Session closed: {} (active: {})",
                sid,
                store.len()
            );
            Ok(axum::http::StatusCode::NO_CONTENT)
        } else {
            Err(ServerError::NotFound("Session not found".into()))
        }
    } else {
        Err(ServerError::BadRequest(
            "Missing Mcp-Session-Id header".into(),
        ))
    }
}

// ─── Tool Definitions ─────────────────────────────────────────────────

fn build_tool_list() -> Vec<serde_json::Value> {
    vec![tool_def(
        TOOL_HENT_KONSULENTER,
        "Henter alle konsulenter med deres detaljer.",
        serde_json::json!({
            "type": "object",
            "properties": {}
        }),
    )]
}

fn tool_def(name: &str, description: &str, input_schema: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "description": description,
        "inputSchema": input_schema,
    })
}

/// Execute an MCP tool by name.
fn execute_tool(state: &ProviderState, name: &str) -> serde_json::Value {
    match name {
        TOOL_HENT_KONSULENTER => {
            tool_result_text(&serde_json::to_string_pretty(state.roster.all()).unwrap_or_default())
        }
        _ => tool_result_error(&format!("Unknown tool: {}", name)),
    }
}

fn tool_result_text(text: &str) -> serde_json::Value {
    serde_json::json!({
        "content": [{ "type": "text", "text": text }]
    })
}

fn tool_result_error(msg: &str) -> serde_json::Value {
    serde_json::json!({
        "isError": true,
        "content": [{ "type": "text", "text": msg }]
    })
}
