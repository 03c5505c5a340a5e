//! Timer model and payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tag::Tag;

/// Server-tracked timer status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerStatus {
    Running,
    Paused,
    Stopped,
    Confirmed,
    Cancelled,
}

/// One run/pause cycle of a timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerCycle {
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub duration_seconds: i64,
}

/// Server-authoritative timer snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timer {
    pub id: i64,
    pub status: TimerStatus,
    #[serde(default)]
    pub cycles: Vec<TimerCycle>,
    pub total_seconds: i64,
    pub wallet_id: i64,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// New timer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTimer {
    pub wallet_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<i64>>,
}

/// Timer update payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateTimer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<i64>>,
}

/// Edited cycle boundaries supplied on confirm or cycle update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleEdit {
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}
