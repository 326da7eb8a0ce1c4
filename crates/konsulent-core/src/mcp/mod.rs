//! MCP (Model Context Protocol) support: JSON-RPC types shared by the
//! provider endpoint and the roster client.

pub mod client;
pub mod types;

pub use client::RosterClient;
