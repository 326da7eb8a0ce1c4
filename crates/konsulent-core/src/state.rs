//! Shared state for the two server roles.

use std::sync::Arc;

use crate::mcp::RosterClient;
use crate::roster::Roster;
use crate::summary::Summarizer;

/// State held by the roster provider: the roster it serves.
pub struct ProviderStateInner {
    pub roster: Roster,
}

impl ProviderStateInner {
    pub fn new(roster: Roster) -> Self {
        Self { roster }
    }
}

pub type ProviderState = Arc<ProviderStateInner>;

/// State held by the query service: the upstream roster client and the
/// summary generator.
#[derive(Debug)]
pub struct QueryStateInner {
    pub roster_client: RosterClient,
    pub summarizer: Summarizer,
}

impl QueryStateInner {
    pub fn new(roster_client: RosterClient, summarizer: Summarizer) -> Self {
        Self {
            roster_client,
            summarizer,
        }
    }
}

pub type QueryState = Arc<QueryStateInner>;
