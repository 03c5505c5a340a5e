//! Import plan models and payloads
//!
//! An import plan is a staged, reviewable batch of ledger entries parsed
//! from an uploaded CSV/XLSX file, confirmed or cancelled as a unit.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ledger::EntryKind;

/// Import plan lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl ImportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportStatus::Pending => "pending",
            ImportStatus::Confirmed => "confirmed",
            ImportStatus::Cancelled => "cancelled",
        }
    }
}

/// Staged batch of parsed ledger entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportPlan {
    pub id: i64,
    pub wallet_id: i64,
    pub status: ImportStatus,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<ImportPlanRow>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One staged row of an import plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportPlanRow {
    pub id: i64,
    pub import_plan_id: i64,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Hour quantity, decimal-safe string
    pub hours: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub reference_date: Option<NaiveDate>,
}

/// Row creation/update payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ImportRowForm {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntryKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_date: Option<NaiveDate>,
}

/// List filters for `GET /import-plans`
#[derive(Debug, Clone, Default)]
pub struct ImportFilters {
    pub status: Option<ImportStatus>,
    pub wallet_id: Option<i64>,
}

/// Template download format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFormat {
    Csv,
    Xlsx,
}

impl TemplateFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateFormat::Csv => "csv",
            TemplateFormat::Xlsx => "xlsx",
        }
    }
}
