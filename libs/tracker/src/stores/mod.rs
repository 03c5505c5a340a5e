//! Domain CRUD stores
//!
//! Each store owns one in-memory collection plus at most one current
//! selection, a loading flag, the last error message, and pagination
//! metadata where the endpoint paginates. Every action performs exactly one
//! HTTP call and applies a minimal local mutation on success. Fetches record
//! failures for display; mutating actions additionally propagate them so the
//! caller can react.

pub mod clients;
pub mod imports;
pub mod ledger;
pub mod reports;
pub mod tags;
pub mod wallets;

pub use clients::ClientStore;
pub use imports::ImportStore;
pub use ledger::LedgerStore;
pub use reports::ReportStore;
pub use tags::TagStore;
pub use wallets::WalletStore;
