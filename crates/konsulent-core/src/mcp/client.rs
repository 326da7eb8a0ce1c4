//! MCP roster client - fetches the consultant roster from the provider
//! process over streamable HTTP.
//!
//! Each fetch runs a full session: `initialize`, `notifications/initialized`,
//! `tools/call hent_konsulenter`, then session teardown. Provider availability
//! is therefore a per-request concern and surfaces as an `Upstream` error.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::ServerError;
use crate::mcp::types::{
    JsonRpcRequest, JsonRpcResponse, ToolCallResult, MCP_PROTOCOL_VERSION, MCP_SESSION_HEADER,
    TOOL_HENT_KONSULENTER,
};
use crate::models::Consultant;

/// HTTP client for the roster provider's MCP endpoint.
#[derive(Debug)]
pub struct RosterClient {
    client: reqwest::Client,
    base_url: String,
    next_id: AtomicU64,
}

impl RosterClient {
    /// Create a client for a provider base URL (e.g. `http://127.0.0.1:4100`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn mcp_url(&self) -> String {
        format!("{}/mcp", self.base_url)
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Fetch the complete roster in the provider's definition order.
    pub async fn fetch_consultants(&self) -> Result<Vec<Consultant>, ServerError> {
        tracing::info!("[RosterClient] Fetching roster from {}", self.mcp_url());

        // The session id comes back in a response header on initialize
        let response = self
            .post_rpc(
                None,
                &JsonRpcRequest::call(
                    self.next_id(),
                    "initialize",
                    serde_json::json!({
                        "protocolVersion": MCP_PROTOCOL_VERSION,
                        "capabilities": {},
                        "clientInfo": {
                            "name": "konsulent-query",
                            "version": env!("CARGO_PKG_VERSION")
                        }
                    }),
                ),
            )
            .await?;

        let session_id = response
            .headers()
            .get(MCP_SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let init: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| ServerError::Upstream(format!("Malformed initialize response: {}", e)))?;
        if let Some(err) = init.error {
            return Err(ServerError::Upstream(format!(
                "initialize failed: {} (code {})",
                err.message, err.code
            )));
        }

        self.post_rpc(
            session_id.as_deref(),
            &JsonRpcRequest::notification("notifications/initialized"),
        )
        .await?;

        let response = self
            .post_rpc(
                session_id.as_deref(),
                &JsonRpcRequest::call(
                    self.next_id(),
                    "tools/call",
                    serde_json::json!({
                        "name": TOOL_HENT_KONSULENTER,
                        "arguments": {}
                    }),
                ),
            )
            .await?;

        let reply: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| ServerError::Upstream(format!("Malformed tools/call response: {}", e)))?;

        // Best-effort session teardown
        if let Some(sid) = &session_id {
            if let Err(e) = self
                .client
                .delete(self.mcp_url())
                .header(MCP_SESSION_HEADER, sid)
                .send()
                .await
            {
                tracing::warn!("[RosterClient] Session teardown failed: {}", e);
            }
        }

        if let Some(err) = reply.error {
            return Err(ServerError::Upstream(format!(
                "tools/call failed: {} (code {})",
                err.message, err.code
            )));
        }
        let result = reply
            .result
            .ok_or_else(|| ServerError::Upstream("tools/call response missing result".into()))?;

        let call: ToolCallResult = serde_json::from_value(result)
            .map_err(|e| ServerError::Upstream(format!("Malformed tool result: {}", e)))?;
        if call.is_error {
            return Err(ServerError::Upstream(format!(
                "Provider tool error: {}",
                call.text()
            )));
        }

        let consultants: Vec<Consultant> = serde_json::from_str(&call.text())
            .map_err(|e| ServerError::Upstream(format!("Malformed roster payload: {}", e)))?;

        for c in &consultants {
            if c.workload_percent > 100 {
                return Err(ServerError::Upstream(format!(
                    "Malformed roster entry '{}': workload {}% is outside 0-100",
                    c.name, c.workload_percent
                )));
            }
        }

        tracing::info!("[RosterClient] Fetched {} consultants", consultants.len());
        Ok(consultants)
    }

    async fn post_rpc(
        &self,
        session_id: Option<&str>,
        body: &JsonRpcRequest,
    ) -> Result<reqwest::Response, ServerError> {
        let mut request = self.client.post(self.mcp_url()).json(body);
        if let Some(sid) = session_id {
            request = request.header(MCP_SESSION_HEADER, sid);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ServerError::Upstream(format!("Provider request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ServerError::Upstream(format!(
                "Provider returned HTTP {}",
                response.status()
            )));
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::net::SocketAddr;

    /// Minimal provider endpoint: answers the MCP handshake and serves a
    /// fixed `tools/call` text payload.
    async fn start_stub_provider(roster_text: &'static str) -> SocketAddr {
        use axum::{routing::post, Json, Router};

        let app = Router::new().route(
            "/mcp",
            post(move |Json(body): Json<serde_json::Value>| async move {
                let method = body.get("method").and_then(|m| m.as_str()).unwrap_or("");
                let id = body.get("id").cloned().unwrap_or(serde_json::Value::Null);
                let result = match method {
                    "initialize" => serde_json::json!({
                        "protocolVersion": MCP_PROTOCOL_VERSION,
                        "capabilities": { "tools": { "listChanged": false } },
                        "serverInfo": { "name": "stub-provider", "version": "0.0.0" }
                    }),
                    "tools/call" => serde_json::json!({
                        "content": [{ "type": "text", "text": roster_text }]
                    }),
                    _ => serde_json::json!({}),
                };
                Json(serde_json::json!({ "jsonrpc": "2.0", "id": id, "result": result }))
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[test]
    fn test_base_url_is_trimmed() {
        let client = RosterClient::new("http://127.0.0.1:4100/");
        assert_eq!(client.base_url(), "http://127.0.0.1:4100");
        assert_eq!(client.mcp_url(), "http://127.0.0.1:4100/mcp");
    }

    #[tokio::test]
    async fn test_fetch_rejects_out_of_range_workload() {
        let addr = start_stub_provider(
            r#"[{"id": 1, "navn": "Kari", "ferdigheter": ["rust"], "belastning_prosent": 150}]"#,
        )
        .await;

        let client = RosterClient::new(format!("http://{}", addr));
        let err = client.fetch_consultants().await.unwrap_err();
        assert!(matches!(err, ServerError::Upstream(_)));
        assert!(err.to_string().contains("workload 150% is outside 0-100"));
    }

    #[tokio::test]
    async fn test_fetch_rejects_unparseable_payload() {
        let addr = start_stub_provider("not a roster").await;

        let client = RosterClient::new(format!("http://{}", addr));
        let err = client.fetch_consultants().await.unwrap_err();
        assert!(matches!(err, ServerError::Upstream(_)));
        assert!(err.to_string().contains("Malformed roster payload"));
    }
}
