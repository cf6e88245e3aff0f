//! Wire models for the trade API.
//!
//! Only the search response has a shape this tool relies on. Detail
//! documents are opaque and stay `serde_json::Value`, emitted verbatim.

use serde::Deserialize;

/// Response body of the search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    /// Server-assigned query identifier.
    #[serde(default)]
    pub id: Option<String>,

    /// Ordered list of offer identifiers.
    #[serde(default)]
    pub result: Vec<String>,

    /// Total matches known to the server.
    #[serde(default)]
    pub total: Option<u64>,
}
