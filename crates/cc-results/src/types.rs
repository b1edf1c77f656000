//! Export data types.

use cc_controls::ControllerParams;
use cc_sim::{HistorySample, StateSnapshot};
use chrono::Utc;
use serde::{Deserialize, Serialize};

pub type ExportId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportManifest {
    pub export_id: ExportId,
    pub session_name: String,
    /// RFC 3339 UTC timestamp.
    pub created_at: String,
    pub controller: ControllerParams,
    pub final_state: StateSnapshot,
    pub sample_count: usize,
    /// Time of the last sample (seconds), 0 when empty.
    pub duration_s: f64,
}

impl ExportManifest {
    pub fn new(
        session_name: &str,
        controller: ControllerParams,
        final_state: StateSnapshot,
        samples: &[HistorySample],
    ) -> Self {
        let now = Utc::now();
        Self {
            export_id: format!("{}-{}", sanitize(session_name), now.format("%Y%m%dT%H%M%S%.3fZ")),
            session_name: session_name.to_string(),
            created_at: now.to_rfc3339(),
            controller,
            final_state,
            sample_count: samples.len(),
            duration_s: samples.last().map_or(0.0, |s| s.time),
        }
    }
}

fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "session".to_string()
    } else {
        cleaned
    }
}
