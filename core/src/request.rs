//! Request descriptors, query building, and multipart payloads.
//!
//! # Design
//! A [`RequestOptions`] value describes one HTTP exchange: method, header
//! overrides, body, and an optional timeout override. Descriptors are built
//! per call, used once, and dropped — the pipeline keeps no connection or
//! retry state between calls.
//!
//! Query strings are built from `(key, QueryValue)` pairs so call sites can
//! mix strings, numbers, booleans, and optional values; `Null` entries are
//! omitted rather than serialized, matching the server's expectation that
//! absent filters simply do not appear.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use crate::error::ApiError;

/// Chunk size used when streaming a multipart file with progress reporting.
const PROGRESS_CHUNK_SIZE: usize = 64 * 1024;

pub use reqwest::Method;

/// One query-string value. `Null` entries are dropped from the query string.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl QueryValue {
    /// Stringified form, or `None` for `Null`.
    fn render(&self) -> Option<String> {
        match self {
            QueryValue::Str(s) => Some(s.clone()),
            QueryValue::Int(i) => Some(i.to_string()),
            QueryValue::Float(f) => Some(f.to_string()),
            QueryValue::Bool(b) => Some(b.to_string()),
            QueryValue::Null => None,
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Str(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Str(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Int(value)
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        QueryValue::Int(i64::from(value))
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Float(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => QueryValue::Null,
        }
    }
}

/// Append `params` to `url` as a query string.
///
/// `Null` values are omitted; everything else is stringified and
/// percent-escaped. Uses `?` unless the url already carries a query string,
/// in which case `&` continues it.
pub fn append_query(url: &str, params: &[(&str, QueryValue)]) -> String {
    let mut pairs = Vec::new();
    for (key, value) in params {
        if let Some(rendered) = value.render() {
            pairs.push(format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(&rendered)
            ));
        }
    }
    if pairs.is_empty() {
        return url.to_string();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{}", pairs.join("&"))
}

/// Resolve `url` against `base_url` unless it is already absolute.
pub fn resolve_url(base_url: &str, url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("{base_url}{url}")
    }
}

/// Request body: a JSON document, or a multipart form for file uploads.
///
/// Multipart forms own their boundary-based `Content-Type`, so the pipeline
/// does not apply the JSON default to them.
pub enum Body {
    Json(serde_json::Value),
    Multipart(reqwest::multipart::Form),
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Body::Json(value) => f.debug_tuple("Json").field(value).finish(),
            Body::Multipart(_) => f.write_str("Multipart(..)"),
        }
    }
}

/// Descriptor for one HTTP exchange. Built per call, used once, dropped.
#[derive(Debug)]
pub struct RequestOptions {
    pub method: Method,
    /// Header overrides merged over the default header set.
    pub headers: Vec<(String, String)>,
    pub body: Option<Body>,
    /// Overrides the client's default timeout when set.
    pub timeout: Option<Duration>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            body: None,
            timeout: None,
        }
    }
}

impl RequestOptions {
    pub fn method(method: Method) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    pub fn json(method: Method, body: serde_json::Value) -> Self {
        Self {
            method,
            body: Some(Body::Json(body)),
            ..Default::default()
        }
    }

    pub fn multipart(method: Method, form: reqwest::multipart::Form) -> Self {
        Self {
            method,
            body: Some(Body::Multipart(form)),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// An in-memory file destined for a multipart upload, standing in for the
/// browser `File` the original UI hands to the uploader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    pub file_name: String,
    /// MIME type, e.g. `image/png`.
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl FilePayload {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| ApiError::new(format!("failed to read {}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        let mime = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    /// Build a multipart form with this file under `field_name`.
    pub fn into_form(self, field_name: &str) -> Result<reqwest::multipart::Form, ApiError> {
        let part = reqwest::multipart::Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime)?;
        Ok(reqwest::multipart::Form::new().part(field_name.to_string(), part))
    }

    /// Build a multipart form that reports upload progress.
    ///
    /// The file is streamed in chunks; `on_progress` is invoked with
    /// `(sent_bytes, total_bytes)` as each chunk is handed to the transport.
    pub fn into_form_with_progress(
        self,
        field_name: &str,
        on_progress: impl Fn(u64, u64) + Send + Sync + 'static,
    ) -> Result<reqwest::multipart::Form, ApiError> {
        let total = self.bytes.len() as u64;
        let sent = Arc::new(AtomicU64::new(0));
        let chunks: Vec<Bytes> = self
            .bytes
            .chunks(PROGRESS_CHUNK_SIZE)
            .map(Bytes::copy_from_slice)
            .collect();
        let stream = futures::stream::iter(chunks.into_iter().map(move |chunk| {
            let so_far = sent.fetch_add(chunk.len() as u64, Ordering::Relaxed) + chunk.len() as u64;
            on_progress(so_far, total);
            Ok::<Bytes, std::io::Error>(chunk)
        }));
        let part = reqwest::multipart::Part::stream_with_length(
            reqwest::Body::wrap_stream(stream),
            total,
        )
        .file_name(self.file_name)
        .mime_str(&self.mime)?;
        Ok(reqwest::multipart::Form::new().part(field_name.to_string(), part))
    }
}
