//! Ledger entry model and payloads

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::tag::Tag;
use super::wallet::Wallet;

/// Kind of ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Credit,
    Debit,
    Adjustment,
}

/// Immutable credit/debit/adjustment record against a wallet's balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: i64,
    pub wallet_id: i64,
    /// Hour quantity, decimal-safe string
    pub hours: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub reference_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet: Option<Wallet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New ledger entry payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLedgerEntry {
    pub wallet_id: i64,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Hour quantity, decimal-safe string
    pub hours: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<i64>>,
}

/// Response of `POST /ledger-entries`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedEntry {
    pub entry: LedgerEntry,
    /// Wallet balance after the entry was applied
    pub new_balance: String,
}
