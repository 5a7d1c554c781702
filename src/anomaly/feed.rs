//! Authoritative feed data contract
//!
//! The backend service owns canonical anomaly state and hands the core
//! complete snapshots on its own cadence. A single malformed record must
//! never take down the reconciler, so parsing is per-element: bad entries
//! are logged and skipped, and only a structurally invalid document is an
//! error.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::error::{Result, SurveyError};
use crate::core::types::Vec2;

/// One record from the authoritative anomaly feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedAnomaly {
    /// Opaque backend ID; never contains `:` by contract
    pub id: String,
    /// Kind tag; unknown tags fall back to the default catalog entry
    #[serde(rename = "type")]
    pub kind_tag: String,
    /// Severity in [0, 1]
    pub severity: f32,
    pub location: Vec2,
    pub resolved: bool,
}

impl FeedAnomaly {
    /// Contract checks applied before a record enters the reconciler
    pub fn is_well_formed(&self) -> bool {
        !self.id.is_empty()
            && !self.id.contains(':')
            && self.location.is_finite()
            && (0.0..=1.0).contains(&self.severity)
    }
}

/// Parse an authoritative snapshot from JSON text.
///
/// Individually malformed elements are skipped with a warning; an error is
/// returned only when the document itself is not a JSON array.
pub fn parse_feed(json: &str) -> Result<Vec<FeedAnomaly>> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(json)
        .map_err(|e| SurveyError::FeedDecode(format!("snapshot is not a JSON array: {}", e)))?;

    let mut records = Vec::with_capacity(raw.len());
    for (i, value) in raw.into_iter().enumerate() {
        match serde_json::from_value::<FeedAnomaly>(value) {
            Ok(record) if record.is_well_formed() => records.push(record),
            Ok(record) => {
                warn!(index = i, id = %record.id, "skipping malformed feed record");
            }
            Err(e) => {
                warn!(index = i, error = %e, "skipping undecodable feed record");
            }
        }
    }
    Ok(records)
}
