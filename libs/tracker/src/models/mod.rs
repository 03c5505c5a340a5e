//! Tracker domain models
//!
//! Server-issued records. Monetary and hour quantities are decimal-safe
//! strings, never floating point.

pub mod client;
pub mod import;
pub mod ledger;
pub mod report;
pub mod tag;
pub mod timer;
pub mod wallet;

use serde::{Deserialize, Serialize};

// Re-export for convenience
pub use client::{Client, NewClient, UpdateClient};
pub use import::{
    ImportFilters, ImportPlan, ImportPlanRow, ImportRowForm, ImportStatus, TemplateFormat,
};
pub use ledger::{CreatedEntry, EntryKind, LedgerEntry, NewLedgerEntry};
pub use report::{GroupBy, GroupedTotals, Report, ReportFilters, ReportSummary};
pub use tag::{NewTag, Tag};
pub use timer::{CycleEdit, NewTimer, Timer, TimerCycle, TimerStatus, UpdateTimer};
pub use wallet::{NewWallet, UpdateWallet, Wallet, WalletWithBalance};

/// Paginated list envelope returned by every list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: u64,
}

/// Client-side pagination summary kept by each store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: u32,
    pub last_page: u32,
    pub total: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            current_page: 1,
            last_page: 1,
            total: 0,
        }
    }
}

impl Pagination {
    /// Summarize a paginated envelope
    pub fn from_page<T>(page: &Paginated<T>) -> Self {
        Pagination {
            current_page: page.current_page,
            last_page: page.last_page,
            total: page.total,
        }
    }
}
