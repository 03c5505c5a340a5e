//! Time tracking domain: timers, wallets, ledger entries, and imports
//!
//! Built on the shared [`common`] API client. The [`timer::TimerStore`] adds
//! background polling so a timer started elsewhere is picked up, while the
//! [`stores`] hold the CRUD collections the UI renders.

pub mod models;
pub mod stores;
pub mod timer;

pub use stores::{
    ClientStore, ImportStore, LedgerStore, ReportStore, TagStore, WalletStore,
};
pub use timer::TimerStore;
