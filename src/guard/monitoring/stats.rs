//! Performance statistics snapshot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Point-in-time copy of the monitoring counters.
///
/// `Default` is the snapshot of a monitor that was never initialised.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct PerformanceStats {
    pub is_monitoring: bool,
    pub initialized_at: Option<DateTime<Utc>>,
    pub operations_completed: u64,
    pub operation_failures: u64,
    pub timeouts_triggered: u64,
    pub chunk_jobs_run: u64,
    pub chunks_processed: u64,
    pub items_processed: u64,
    pub isolate_tasks_run: u64,
    pub worker_failures: u64,
    pub yields: u64,
    pub stalls_detected: u64,
    pub max_heartbeat_lag_ms: u64,
}

impl PerformanceStats {
    /// The snapshot as a JSON object keyed by counter name.
    #[must_use]
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}
