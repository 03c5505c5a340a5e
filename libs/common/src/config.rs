//! API client configuration

use std::env;

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the backend API, including the `/api` prefix
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl ApiConfig {
    /// Create a new ApiConfig from environment variables
    ///
    /// # Environment Variables
    /// - `HOURBANK_API_URL`: Base API URL (default: "http://localhost:8000/api")
    /// - `HOURBANK_HTTP_TIMEOUT`: Request timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let base_url = env::var("HOURBANK_API_URL")
            .unwrap_or_else(|_| "http://localhost:8000/api".to_string());

        let timeout_seconds = env::var("HOURBANK_HTTP_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        ApiConfig {
            base_url,
            timeout_seconds,
        }
    }

    /// Create a config pointing at an explicit base URL with default timeout
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        ApiConfig {
            base_url: base_url.into(),
            timeout_seconds: 30,
        }
    }
}
