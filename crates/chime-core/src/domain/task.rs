use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::TaskId;

/// Incoming registration body.
///
/// Missing string fields decode as empty so that validation, not the decoder,
/// reports which field is absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleRequest {
    #[serde(default)]
    pub scheduled_at: String,
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub payload: serde_json::Value,
    #[serde(default)]
    pub id: Option<String>,
}

/// A validated task held by the store until it fires.
///
/// `scheduled_at` is the caller's RFC3339 text, kept verbatim: it is the bucket
/// key and it is what listings echo back. `target` is the parsed instant the
/// dispatcher waits for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledTask {
    scheduled_at: String,
    endpoint: String,
    payload: serde_json::Value,
    id: TaskId,
    #[serde(skip)]
    target: DateTime<FixedOffset>,
}

impl ScheduledTask {
    pub fn new(
        id: TaskId,
        scheduled_at: impl Into<String>,
        target: DateTime<FixedOffset>,
        endpoint: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            scheduled_at: scheduled_at.into(),
            endpoint: endpoint.into(),
            payload,
            id,
            target,
        }
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    /// Bucket key.
    pub fn scheduled_at(&self) -> &str {
        &self.scheduled_at
    }

    pub fn target(&self) -> DateTime<FixedOffset> {
        self.target
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }
}
