//! ETL pipelines, third-party integrations and system entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::RecordId;

/// Pipeline run state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    Running,
    Completed,
    Failed,
    Scheduled,
    Paused,
}

impl PipelineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Scheduled => "scheduled",
            Self::Paused => "paused",
        }
    }
}

/// ETL pipeline with its latest run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EtlPipeline {
    pub id: RecordId,
    pub name: String,
    pub source: String,
    pub target: String,
    pub status: PipelineStatus,
    #[serde(default)]
    pub last_run: Option<DateTime<Utc>>,
    #[serde(default)]
    pub records_processed: u64,
    #[serde(default)]
    pub records_failed: u64,
    #[serde(default)]
    pub duration_seconds: Option<u64>,
    #[serde(default)]
    pub schedule: Option<String>,
}

impl EtlPipeline {
    /// Share of records processed without error, as a percentage.
    pub fn success_rate(&self) -> Option<f64> {
        let total = self.records_processed.saturating_add(self.records_failed);
        if total == 0 {
            return None;
        }
        Some(self.records_processed as f64 / total as f64 * 100.0)
    }
}

/// Connection state of a third-party integration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationStatus {
    Connected,
    Disconnected,
    Error,
    Pending,
}

impl IntegrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::Error => "error",
            Self::Pending => "pending",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Integration {
    pub id: RecordId,
    pub name: String,
    pub provider: String,
    #[serde(default)]
    pub category: Option<String>,
    pub status: IntegrationStatus,
    #[serde(default)]
    pub last_sync: Option<DateTime<Utc>>,
    #[serde(default)]
    pub records_synced: u64,
}

/// Legal entity known to the back office
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SystemEntity {
    pub id: RecordId,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Reachability of one back-office subsystem
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub latency_ms: Option<u64>,
}
