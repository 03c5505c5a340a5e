//! Report models and filters

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ledger::{EntryKind, LedgerEntry};
use super::Paginated;

/// Aggregated totals over a set of ledger entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_credits: String,
    pub total_debits: String,
    pub net_balance: String,
    pub entry_count: u64,
}

/// Per-wallet or per-client grouped totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupedTotals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    pub total_credits: String,
    pub total_debits: String,
    pub net_balance: String,
    pub entry_count: u64,
}

/// Response of `GET /reports`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub summary: ReportSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<Paginated<LedgerEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grouped: Option<Vec<GroupedTotals>>,
}

/// Grouping dimension for report queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Wallet,
    Client,
}

impl GroupBy {
    fn as_str(&self) -> &'static str {
        match self {
            GroupBy::Wallet => "wallet",
            GroupBy::Client => "client",
        }
    }
}

/// Report query filters
///
/// Serialized by hand into query pairs because `tags` repeats its key
/// (`tags[]`), which the generic query folding deliberately drops.
#[derive(Debug, Clone, Default)]
pub struct ReportFilters {
    pub client_id: Option<i64>,
    pub wallet_id: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub tags: Vec<i64>,
    pub kind: Option<EntryKind>,
    pub group_by: Option<GroupBy>,
    pub per_page: Option<u32>,
}

impl ReportFilters {
    /// Build the explicit query pairs for this filter set
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if let Some(client_id) = self.client_id {
            pairs.push(("client_id".to_string(), client_id.to_string()));
        }

        if let Some(wallet_id) = self.wallet_id {
            pairs.push(("wallet_id".to_string(), wallet_id.to_string()));
        }

        if let Some(date_from) = self.date_from {
            pairs.push(("date_from".to_string(), date_from.to_string()));
        }

        if let Some(date_to) = self.date_to {
            pairs.push(("date_to".to_string(), date_to.to_string()));
        }

        for tag in &self.tags {
            pairs.push(("tags[]".to_string(), tag.to_string()));
        }

        if let Some(kind) = self.kind {
            let value = match kind {
                EntryKind::Credit => "credit",
                EntryKind::Debit => "debit",
                EntryKind::Adjustment => "adjustment",
            };
            pairs.push(("type".to_string(), value.to_string()));
        }

        if let Some(group_by) = self.group_by {
            pairs.push(("group_by".to_string(), group_by.as_str().to_string()));
        }

        if let Some(per_page) = self.per_page {
            pairs.push(("per_page".to_string(), per_page.to_string()));
        }

        pairs
    }
}
