//! Domain DTOs shared by the client and its callers.
//!
//! # Design
//! These types mirror the server's schema but are defined independently from
//! the mock-server crate; integration tests catch schema drift. `People` keeps
//! its known fields explicit and preserves everything else in a flattened
//! side map, so free-form record fields survive a round-trip instead of being
//! silently dropped.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Uniform response wrapper returned by every endpoint.
///
/// `error_code == 0` means application-level success. A non-zero code with
/// `error_info` set signals an application failure on an otherwise successful
/// HTTP exchange — a separate channel from [`ApiError`](crate::ApiError),
/// which the pipeline raises for transport/HTTP failures. Callers check both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default)]
    pub error_code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_info: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(&self) -> bool {
        self.error_code == 0
    }
}

/// An empty envelope: success, no payload. Returned for 2xx responses that
/// carry no JSON body (e.g. 204 No Content).
impl<T> Default for Envelope<T> {
    fn default() -> Self {
        Self {
            data: None,
            error_code: 0,
            error_info: None,
        }
    }
}

/// A people profile record.
///
/// Known fields are explicit; anything else the server or the recognition
/// backend attaches (occupation, hobbies, remark, ...) lands in `extra` and
/// is serialized back verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct People {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<String>,
    /// Creation time as a unix timestamp, assigned by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    /// URL of the record's cover image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    /// Free-form fields preserved round-trip.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Query parameters accepted by `GET /peoples`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeopleQuery {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub age: Option<u32>,
    pub height: Option<f64>,
    pub marital_status: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub search: Option<String>,
    pub top_k: Option<u32>,
}

impl PeopleQuery {
    /// Flatten into key/value pairs for the query string. Unset fields are
    /// omitted entirely.
    pub fn to_params(&self) -> Vec<(&'static str, crate::QueryValue)> {
        use crate::QueryValue;
        let mut params = Vec::new();
        let mut push = |key, value: Option<QueryValue>| {
            if let Some(value) = value {
                params.push((key, value));
            }
        };
        push("name", self.name.clone().map(QueryValue::from));
        push("gender", self.gender.clone().map(QueryValue::from));
        push("age", self.age.map(QueryValue::from));
        push("height", self.height.map(QueryValue::from));
        push(
            "marital_status",
            self.marital_status.clone().map(QueryValue::from),
        );
        push("limit", self.limit.map(QueryValue::from));
        push("offset", self.offset.map(QueryValue::from));
        push("search", self.search.clone().map(QueryValue::from));
        push("top_k", self.top_k.map(QueryValue::from));
        params
    }
}

/// Where a verification code should be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Phone,
    Email,
}

/// Why a verification code is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeScene {
    Register,
    Update,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendCodeRequest {
    pub target_type: TargetType,
    pub target: String,
    pub scene: CodeScene,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub password: String,
    pub code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub password: String,
}

/// Payload of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenData {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub created_at: String,
    pub nickname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePhoneRequest {
    pub phone: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateEmailRequest {
    pub email: String,
    pub code: String,
}

/// Payload of `POST /upload/image`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub url: String,
}

/// One entry of a 422 validation error body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub loc: Vec<Value>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpValidationError {
    pub detail: Vec<ValidationError>,
}
