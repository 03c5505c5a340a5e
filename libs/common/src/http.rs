//! HTTP client for the backend API
//!
//! Wraps `reqwest` with the conventions every store relies on: the bearer
//! token is attached whenever one is present in storage (its absence is not
//! an error — the server decides), bodies are JSON except multipart uploads,
//! non-2xx responses become [`ApiError::RequestFailed`] carrying the server
//! message, a 204 decodes as JSON `null`, and everything else must match the
//! caller's type exactly. Blob downloads negotiate their filename from the
//! response headers.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use chrono::Utc;
use regex::Regex;
use reqwest::header::ACCEPT;
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::storage::{Storage, TOKEN_KEY};

/// HTTP client bound to the backend API
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    storage: Arc<dyn Storage>,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// Cookies are stored and forwarded alongside the bearer token, matching
    /// the backend's dual authentication mechanism.
    pub fn new(config: &ApiConfig, storage: Arc<dyn Storage>) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(ApiClient {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            storage,
        })
    }

    /// The storage this client reads its bearer token from
    pub fn storage(&self) -> Arc<dyn Storage> {
        Arc::clone(&self.storage)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn builder(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let mut builder = self
            .http
            .request(method, self.url(path))
            .header(ACCEPT, "application/json");

        if let Some(token) = self.storage.get(TOKEN_KEY)? {
            builder = builder.bearer_auth(token);
        }

        Ok(builder)
    }

    async fn send(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let server_message = serde_json::from_slice::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from));

            return Err(ApiError::request_failed(status.as_u16(), server_message));
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> ApiResult<T> {
        // 204 and empty bodies decode as JSON null, so callers can ask for
        // Option<T> or () without a decode error.
        if response.status() == StatusCode::NO_CONTENT {
            return serde_json::from_value(Value::Null).map_err(ApiError::Decode);
        }

        let body = response.bytes().await?;

        if body.is_empty() {
            return serde_json::from_value(Value::Null).map_err(ApiError::Decode);
        }

        serde_json::from_slice(&body).map_err(ApiError::Decode)
    }

    /// GET a JSON resource
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.send(self.builder(Method::GET, path)?).await?;
        self.decode(response).await
    }

    /// GET with a params object folded into the query string
    ///
    /// Nested objects and arrays are dropped from the query rather than
    /// serialized; callers needing repeated keys use [`ApiClient::get_pairs`].
    pub async fn get_query<T, Q>(&self, path: &str, params: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize,
    {
        let value = serde_json::to_value(params).map_err(ApiError::Decode)?;
        let pairs = query_pairs(&value);
        let response = self
            .send(self.builder(Method::GET, path)?.query(&pairs))
            .await?;

        self.decode(response).await
    }

    /// GET with explicit query pairs (supports repeated keys such as `tags[]`)
    pub async fn get_pairs<T: DeserializeOwned>(
        &self,
        path: &str,
        pairs: &[(String, String)],
    ) -> ApiResult<T> {
        let response = self
            .send(self.builder(Method::GET, path)?.query(pairs))
            .await?;

        self.decode(response).await
    }

    /// POST a JSON body
    pub async fn post<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .send(self.builder(Method::POST, path)?.json(body))
            .await?;

        self.decode(response).await
    }

    /// PUT a JSON body
    pub async fn put<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .send(self.builder(Method::PUT, path)?.json(body))
            .await?;

        self.decode(response).await
    }

    /// DELETE a resource
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.send(self.builder(Method::DELETE, path)?).await?;
        self.decode(response).await
    }

    /// POST a multipart form
    ///
    /// No content-type header is set explicitly; reqwest supplies
    /// `multipart/form-data` with the correct boundary.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> ApiResult<T> {
        let response = self
            .send(self.builder(Method::POST, path)?.multipart(form))
            .await?;

        self.decode(response).await
    }

    /// GET a resource as raw text
    pub async fn get_text(&self, path: &str) -> ApiResult<String> {
        let response = self.send(self.builder(Method::GET, path)?).await?;
        Ok(response.text().await?)
    }

    /// GET a resource as raw bytes
    pub async fn get_bytes(&self, path: &str) -> ApiResult<Vec<u8>> {
        let response = self.send(self.builder(Method::GET, path)?).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Download a blob and save it under `dest_dir`, returning the saved path
    ///
    /// The filename is resolved in order: an explicit caller-supplied name,
    /// the `Content-Disposition` header, the `X-Filename` header, and
    /// finally a timestamp-based fallback.
    pub async fn download(
        &self,
        path: &str,
        dest_dir: &Path,
        filename: Option<&str>,
    ) -> ApiResult<PathBuf> {
        let builder = self
            .builder(Method::GET, path)?
            .header(ACCEPT, "application/octet-stream");
        let response = self.send(builder).await?;

        let mut name = filename.map(String::from);

        if name.is_none() {
            name = response
                .headers()
                .get(reqwest::header::CONTENT_DISPOSITION)
                .and_then(|v| v.to_str().ok())
                .and_then(filename_from_disposition);
        }

        if name.is_none() {
            name = response
                .headers()
                .get("X-Filename")
                .and_then(|v| v.to_str().ok())
                .map(String::from);
        }

        let name = sanitize_filename(
            name.unwrap_or_else(|| format!("download_{}", Utc::now().timestamp_millis())),
        );

        let body = response.bytes().await?;

        tokio::fs::create_dir_all(dest_dir).await?;
        let dest = dest_dir.join(&name);
        tokio::fs::write(&dest, &body).await?;

        debug!("Downloaded {} to {}", path, dest.display());
        Ok(dest)
    }
}

/// Fold a serialized params object into query pairs
///
/// Only primitive values survive; nested objects and arrays are dropped to
/// avoid producing invalid query strings. Null values are skipped.
fn query_pairs(value: &Value) -> Vec<(String, String)> {
    let Value::Object(map) = value else {
        return Vec::new();
    };

    let mut pairs = Vec::with_capacity(map.len());

    for (key, value) in map {
        match value {
            Value::String(s) => pairs.push((key.clone(), s.clone())),
            Value::Number(n) => pairs.push((key.clone(), n.to_string())),
            Value::Bool(b) => pairs.push((key.clone(), b.to_string())),
            Value::Null => {}
            Value::Array(_) | Value::Object(_) => {
                debug!("Dropping non-primitive query parameter: {key}");
            }
        }
    }

    pairs
}

/// Extract a filename from a `Content-Disposition` header value
fn filename_from_disposition(value: &str) -> Option<String> {
    static FILENAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = FILENAME_REGEX.get_or_init(|| {
        Regex::new(r#"filename[^;=\n]*=((?:['"]).*?['"]|[^;\n]*)"#)
            .expect("Failed to compile filename regex")
    });

    let captured = regex.captures(value)?.get(1)?.as_str();
    let trimmed = captured.trim().trim_matches(|c| c == '\'' || c == '"');

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Reduce a negotiated filename to a bare file name
fn sanitize_filename(name: String) -> String {
    let candidate = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();

    if candidate.is_empty() || candidate == "." || candidate == ".." {
        format!("download_{}", Utc::now().timestamp_millis())
    } else {
        candidate
    }
}
