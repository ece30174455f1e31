//! Asynchronous API client for the people profile service.
//!
//! # Overview
//! One component: the request pipeline. It resolves URLs against a
//! configured base, serializes JSON and multipart bodies, sends credentials
//! (cookies) with every call, races each call against a timeout, and turns
//! every response into either a parsed [`Envelope`] or a single typed
//! [`ApiError`]. Typed operations for the whole HTTP surface (recognition
//! intake, people records, image upload, account management) sit on top as
//! thin wrappers.
//!
//! # Design
//! - [`ApiClient`] is cheap to clone and carries no per-request state; each
//!   call owns its own timer, so concurrent calls cannot interfere.
//! - Failures travel on two channels: transport/HTTP problems are
//!   `Err(ApiError)` (status 408 for timeouts); application-level rejection
//!   is a non-zero `error_code` inside an `Ok` envelope. Callers check both.
//! - The auth token lives in an injectable [`Session`] owned by the
//!   application, populated on login and cleared on logout — not a global.
//! - No automatic retries and no caching; retry policy belongs to callers.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod types;

pub use api::people::{DEFAULT_TOP_K, FILTER_LIMIT};
pub use api::upload::{validate_image_file, DEFAULT_MAX_IMAGE_BYTES, SUPPORTED_IMAGE_TYPES};
pub use client::{ApiClient, Session};
pub use config::{endpoints, ApiConfig, DEFAULT_TIMEOUT, IMAGE_TIMEOUT, TEXT_TIMEOUT};
pub use error::{ApiError, TIMEOUT_STATUS};
pub use request::{
    append_query, resolve_url, Body, FilePayload, Method, QueryValue, RequestOptions,
};
pub use types::{
    CodeScene, Envelope, HttpValidationError, LoginRequest, People, PeopleQuery, RegisterRequest,
    SendCodeRequest, TargetType, TokenData, UpdateEmailRequest, UpdatePhoneRequest,
    UpdateUserRequest, UploadedImage, User, ValidationError,
};
