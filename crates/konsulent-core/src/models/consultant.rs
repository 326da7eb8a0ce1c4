//! Consultant data model.
//!
//! Rust field names are English; the wire format keeps the Norwegian field
//! names used by the roster provider and the summary endpoint
//! (`navn`, `ferdigheter`, `belastning_prosent`, `tilgjengelighet`).

use serde::{Deserialize, Serialize};

/// A consultant record as served by the roster provider.
///
/// Skills keep the casing they were entered with and are never deduplicated
/// or normalized in storage; matching lower-cases a transient copy only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Consultant {
    pub id: u32,
    #[serde(rename = "navn")]
    pub name: String,
    #[serde(rename = "ferdigheter")]
    pub skills: Vec<String>,
    /// Current load in percent, always in 0..=100.
    #[serde(rename = "belastning_prosent")]
    pub workload_percent: u8,
}

impl Consultant {
    pub fn new(id: u32, name: impl Into<String>, skills: Vec<String>, workload_percent: u8) -> Self {
        Self {
            id,
            name: name.into(),
            skills,
            workload_percent,
        }
    }

    /// Availability is the complement of the current load.
    pub fn availability_percent(&self) -> u8 {
        100 - self.workload_percent
    }
}

/// A filtered query result, derived per request and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AvailableConsultant {
    #[serde(rename = "navn")]
    pub name: String,
    #[serde(rename = "tilgjengelighet")]
    pub availability_percent: u8,
    /// Copied from the source record with original casing.
    #[serde(rename = "ferdigheter")]
    pub skills: Vec<String>,
}
