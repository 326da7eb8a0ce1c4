//! Konsulent Core - transport-agnostic domain logic for the consultant
//! availability service.
//!
//! This crate contains the roster data model, the availability/skill filter,
//! the MCP client used to fetch the roster from the provider process, and the
//! LLM-backed summary generation. It has **no HTTP framework dependency** by
//! default, making it suitable for use in:
//!
//! - HTTP servers (via `konsulent-server`)
//! - CLI tools
//!
//! # Feature Flags
//!
//! - `axum` - Enables `IntoResponse` impl on `ServerError` for use in axum handlers.

pub mod error;
pub mod filter;
pub mod mcp;
pub mod models;
pub mod roster;
pub mod state;
pub mod summary;

// Convenience re-exports
pub use error::ServerError;
pub use roster::Roster;
pub use state::{ProviderState, ProviderStateInner, QueryState, QueryStateInner};
