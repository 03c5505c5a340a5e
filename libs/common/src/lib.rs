//! Common library for the Hourbank client
//!
//! This crate provides the plumbing shared by the session and tracker
//! crates: API configuration, the error taxonomy, durable key-value
//! storage, the HTTP client, and the notification seam.

pub mod config;
pub mod error;
pub mod http;
pub mod notify;
pub mod storage;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use http::ApiClient;
pub use notify::{Notifier, NullNotifier, TracingNotifier};
pub use storage::{FileStorage, MemoryStorage, Storage, TOKEN_KEY};
