//! The API client and the request pipeline.
//!
//! # Design
//! [`ApiClient`] owns the HTTP connection pool (with a cookie store, so
//! credentials ride along automatically), the [`ApiConfig`], and a [`Session`]
//! holding the auth token. It is cheap to clone; clones share the pool and
//! session.
//!
//! Each call races its dispatch against `tokio::time::timeout`. When the
//! timer fires the in-flight future is dropped, which aborts the underlying
//! transfer — the timer and abort state are scoped to the call, so concurrent
//! calls cannot interfere with each other and nothing leaks on either the
//! success or the failure path.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::request::{append_query, resolve_url, Body, FilePayload, Method, QueryValue, RequestOptions};
use crate::types::Envelope;

/// Session state owned by the application, not an ambient global.
///
/// Created at application start (or injected for tests), populated on login,
/// cleared on logout. Authentication itself rides on cookies; the token is
/// kept so the UI layer can tell whether a user is signed in.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<String> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set_token(&self, token: String) {
        match self.token.write() {
            Ok(mut guard) => *guard = Some(token),
            Err(poisoned) => *poisoned.into_inner() = Some(token),
        }
    }

    pub fn clear(&self) {
        match self.token.write() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

/// Asynchronous client for the people profile service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
    session: Session,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        Self::with_session(config, Session::new())
    }

    /// Build a client around an existing session, letting the application
    /// control the session's lifecycle.
    pub fn with_session(config: ApiConfig, session: Session) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(ApiError::from)?;
        Ok(Self {
            http,
            config,
            session,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Dispatch one request described by `options` and interpret the
    /// response as an [`Envelope`].
    ///
    /// `url` is resolved against the configured base URL unless it is
    /// already absolute. The call is raced against the configured timeout;
    /// expiry aborts the transfer and yields a status-408 [`ApiError`].
    pub async fn request<T: DeserializeOwned>(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<Envelope<T>, ApiError> {
        let timeout = options.timeout.unwrap_or(self.config.timeout);
        let full_url = resolve_url(&self.config.base_url, url);
        tracing::debug!(method = %options.method, url = %full_url, "dispatching request");
        match tokio::time::timeout(timeout, self.dispatch(&full_url, options)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(url = %full_url, ?timeout, "request timed out");
                Err(ApiError::timeout())
            }
        }
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<Envelope<T>, ApiError> {
        let RequestOptions {
            method,
            headers,
            body,
            ..
        } = options;

        // Default header set, with caller overrides merged on top. Multipart
        // bodies own their boundary-based Content-Type, so the JSON default
        // is not applied to them.
        let mut header_map = HeaderMap::new();
        if !matches!(body, Some(Body::Multipart(_))) {
            header_map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        for (name, value) in &headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::new(format!("invalid header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ApiError::new(format!("invalid header value for {name}: {e}")))?;
            header_map.insert(name, value);
        }

        let mut builder = self.http.request(method, url).headers(header_map);
        match body {
            Some(Body::Json(value)) => builder = builder.body(serde_json::to_vec(&value)?),
            Some(Body::Multipart(form)) => builder = builder.multipart(form),
            None => {}
        }

        let response = builder.send().await.map_err(ApiError::from)?;
        let status = response.status();

        if !status.is_success() {
            let status_text = status.canonical_reason().unwrap_or("unknown status");
            let raw = response.text().await.unwrap_or_default();
            let data: Value = serde_json::from_str(&raw)
                .unwrap_or_else(|_| serde_json::json!({ "message": status_text }));
            let message = data
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}: {status_text}", status.as_u16()));
            tracing::warn!(status = status.as_u16(), %message, "request failed");
            return Err(ApiError::http(status.as_u16(), message, data));
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"));
        if !is_json {
            // 204s and other bodyless successes surface as an empty envelope.
            return Ok(Envelope::default());
        }
        let text = response.text().await.map_err(ApiError::from)?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::new(format!("failed to decode response: {e}")))
    }

    /// GET with query parameters; `Null` entries are omitted.
    pub async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, QueryValue)],
    ) -> Result<Envelope<T>, ApiError> {
        let url = append_query(url, params);
        self.request(&url, RequestOptions::default()).await
    }

    pub async fn post<T, B>(&self, url: &str, data: &B) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(data)?;
        self.request(url, RequestOptions::json(Method::POST, body))
            .await
    }

    /// POST with a timeout override, for slow endpoints.
    pub async fn post_with_timeout<T, B>(
        &self,
        url: &str,
        data: &B,
        timeout: Duration,
    ) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(data)?;
        self.request(
            url,
            RequestOptions::json(Method::POST, body).with_timeout(timeout),
        )
        .await
    }

    pub async fn put<T, B>(&self, url: &str, data: &B) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(data)?;
        self.request(url, RequestOptions::json(Method::PUT, body))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, url: &str) -> Result<Envelope<T>, ApiError> {
        self.request(url, RequestOptions::method(Method::DELETE))
            .await
    }

    /// POST a file as a multipart form, with `file` under `field_name`.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        url: &str,
        file: FilePayload,
        field_name: &str,
        timeout: Option<Duration>,
    ) -> Result<Envelope<T>, ApiError> {
        let form = file.into_form(field_name)?;
        let mut options = RequestOptions::multipart(Method::POST, form);
        options.timeout = timeout;
        self.request(url, options).await
    }
}
