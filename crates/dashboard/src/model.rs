use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One discovered workload instance. Immutable; rebuilt from the cluster on
/// every cache refresh, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Unique within a namespace for a given discovery cycle.
    pub id: String,
    pub name: String,
    pub namespace: String,
    pub status: JobStatus,
    pub job_type: JobType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flink_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    /// Labels and annotations, used as substitution variables in endpoint
    /// path patterns.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Running,
    Failed,
    Finished,
    Restarting,
    Reconciling,
    Unknown,
}

impl JobStatus {
    /// Translate the operator's raw job state. Anything outside the table
    /// maps to `Unknown` so new upstream states never break discovery.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "RUNNING" => JobStatus::Running,
            "FAILED" => JobStatus::Failed,
            "FINISHED" => JobStatus::Finished,
            "RESTARTING" => JobStatus::Restarting,
            "RECONCILING" => JobStatus::Reconciling,
            _ => JobStatus::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobType {
    Application,
    Session,
}
