//! Client configuration and endpoint paths.
//!
//! # Design
//! All tunables live in one place: the base URL, the process-wide default
//! timeout, and the per-operation overrides the application uses for
//! long-running recognition calls. Endpoint paths are constants (or small
//! helpers for parameterized paths) so call sites never format URLs by hand.

use std::time::Duration;

/// Default timeout applied when a request carries no override.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for free-text recognition, which runs a slow extraction backend.
pub const TEXT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for image recognition and image uploads.
pub const IMAGE_TIMEOUT: Duration = Duration::from_secs(120);

/// Base URL used when `PEOPLE_API_BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8099";

/// Environment variable consulted by [`ApiConfig::from_env`].
pub const BASE_URL_ENV: &str = "PEOPLE_API_BASE_URL";

/// Configuration owned by an [`ApiClient`](crate::ApiClient).
///
/// Constructed once at application start and handed to the client; there is
/// no ambient global configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server origin, without a trailing slash.
    pub base_url: String,
    /// Default per-request timeout.
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Read the base URL from `PEOPLE_API_BASE_URL`, falling back to
    /// [`DEFAULT_BASE_URL`].
    pub fn from_env() -> Self {
        let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(&base_url)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Paths for every endpoint the client targets.
pub mod endpoints {
    pub const RECOGNIZE_TEXT: &str = "/recognition/input";
    pub const RECOGNIZE_IMAGE: &str = "/recognition/image";
    pub const PEOPLES: &str = "/peoples";
    pub const UPLOAD_IMAGE: &str = "/upload/image";
    pub const SEND_CODE: &str = "/user/send_code";
    pub const REGISTER: &str = "/user";
    pub const LOGIN: &str = "/user/login";
    pub const LOGOUT: &str = "/user/me/login";
    pub const ME: &str = "/user/me";
    pub const AVATAR: &str = "/user/me/avatar";
    pub const PHONE: &str = "/user/me/phone";
    pub const EMAIL: &str = "/user/me/email";

    pub fn people_by_id(id: &str) -> String {
        format!("/people/{id}")
    }

    pub fn people_image(id: &str) -> String {
        format!("/people/{id}/image")
    }

    pub fn people_remark(id: &str) -> String {
        format!("/people/{id}/remark")
    }
}
