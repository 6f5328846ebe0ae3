//! Configuration for guarded operations

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::guard::error::ConfigError;

/// Most chunks a list is split into before chunks start to grow.
const MAX_CHUNKS: usize = 100;

/// Broad class of work, used to pick a default timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Network,
    Database,
    Computation,
    Ui,
}

impl OperationKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Network => "network",
            OperationKind::Database => "database",
            OperationKind::Computation => "computation",
            OperationKind::Ui => "ui",
        }
    }
}

/// Configuration for guarded operations
///
/// Durations are stored in TOML as integer milliseconds:
///
/// ```toml
/// default_chunk_size = 25
/// network_timeout_ms = 20000
/// stall_threshold_ms = 3000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    pub default_chunk_size: usize,
    #[serde(rename = "network_timeout_ms", with = "duration_ms")]
    pub network_timeout: Duration,
    #[serde(rename = "database_timeout_ms", with = "duration_ms")]
    pub database_timeout: Duration,
    #[serde(rename = "computation_timeout_ms", with = "duration_ms")]
    pub computation_timeout: Duration,
    #[serde(rename = "ui_timeout_ms", with = "duration_ms")]
    pub ui_timeout: Duration,
    #[serde(rename = "heartbeat_interval_ms", with = "duration_ms")]
    pub heartbeat_interval: Duration,
    #[serde(rename = "stall_threshold_ms", with = "duration_ms")]
    pub stall_threshold: Duration,
    pub isolate_threshold: usize,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            default_chunk_size: 50,
            network_timeout: Duration::from_secs(30),
            database_timeout: Duration::from_secs(15),
            computation_timeout: Duration::from_secs(10),
            ui_timeout: Duration::from_secs(5),
            heartbeat_interval: Duration::from_secs(1),
            stall_threshold: Duration::from_secs(5), // platform ANR watchdog fires at 5s
            isolate_threshold: 1000,
        }
    }
}

impl GuardConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: GuardConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML config file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = tokio::fs::read_to_string(path).await?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_chunk_size == 0 {
            return Err(ConfigError::Invalid {
                field: "default_chunk_size",
                reason: "must be at least 1".to_string(),
            });
        }

        let durations = [
            ("network_timeout_ms", self.network_timeout),
            ("database_timeout_ms", self.database_timeout),
            ("computation_timeout_ms", self.computation_timeout),
            ("ui_timeout_ms", self.ui_timeout),
            ("heartbeat_interval_ms", self.heartbeat_interval),
            ("stall_threshold_ms", self.stall_threshold),
        ];
        for (field, value) in durations {
            if value.is_zero() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Default timeout for a class of work.
    #[must_use]
    pub fn timeout_for(&self, kind: OperationKind) -> Duration {
        match kind {
            OperationKind::Network => self.network_timeout,
            OperationKind::Database => self.database_timeout,
            OperationKind::Computation => self.computation_timeout,
            OperationKind::Ui => self.ui_timeout,
        }
    }

    /// Chunk size for a list of `len` items.
    ///
    /// Short lists go in one chunk. Longer lists use `default_chunk_size`
    /// unless that would produce more than 100 chunks, in which case the
    /// chunk grows so the count stays at 100. Never returns 0.
    #[must_use]
    pub fn optimal_chunk_size(&self, len: usize) -> usize {
        let base = self.default_chunk_size.max(1);
        if len <= base {
            return len.max(1);
        }
        base.max(len.div_ceil(MAX_CHUNKS))
    }

    /// Whether a list of `len` items is big enough to move off-thread.
    #[must_use]
    pub fn should_use_isolate(&self, len: usize) -> bool {
        len >= self.isolate_threshold
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
