//! Custom error types for the common library
//!
//! This module defines the error taxonomy shared by every store in the
//! workspace: transport failures, non-2xx responses, decode failures,
//! durable storage failures, and client-side precondition violations.

use thiserror::Error;

/// Custom error type for API and storage operations
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network-level failure (DNS, connect, timeout) — not distinguished further
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx HTTP response; `message` is the server-supplied message when
    /// present, else `HTTP error <status>`
    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    /// Response body did not match the agreed envelope shape
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// Durable storage read/write failure
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Client-side precondition violation (e.g. timer action with no active timer)
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Poll scheduler could not be started or stopped
    #[error("scheduler error: {0}")]
    Scheduler(String),
}

impl ApiError {
    /// Build a `RequestFailed` from a status code and an optional server message
    pub fn request_failed(status: u16, server_message: Option<String>) -> Self {
        let message = server_message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP error {}", status));

        ApiError::RequestFailed { status, message }
    }
}

/// Type alias for Result with ApiError
pub type ApiResult<T> = Result<T, ApiError>;
