//! In-memory implementation of the people profile service.
//!
//! # Design
//! Mirrors the real server's HTTP surface closely enough to exercise every
//! client operation over real HTTP: envelope-shaped bodies, `{"message"}`
//! error bodies on non-2xx statuses, cookie-based sessions, and multipart
//! uploads. Recognition runs a tiny deterministic `key: value` extractor so
//! tests get stable structured output without a real extraction backend.
//!
//! State lives in shared maps behind `tokio::sync::RwLock`; nothing is
//! persisted. Application-level rejections use both error channels on
//! purpose: registration code mismatch is an HTTP 422, while phone/email
//! update code mismatch is an HTTP 200 with a non-zero `error_code`.

use std::{collections::HashMap, sync::Arc, time::SystemTime};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Verification code issued for every `send_code` request.
pub const VERIFICATION_CODE: &str = "123456";

/// A people record. Known fields are explicit; free-form fields ride in the
/// flattened map. Defined independently from the client crate; integration
/// tests catch schema drift.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Serialize)]
pub struct UserRecord {
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

#[derive(Clone, Debug)]
struct StoredUser {
    user: UserRecord,
    password: String,
}

#[derive(Clone, Default)]
pub struct AppState {
    peoples: Arc<RwLock<HashMap<String, People>>>,
    users: Arc<RwLock<HashMap<String, StoredUser>>>,
    /// session token -> user id
    sessions: Arc<RwLock<HashMap<String, String>>>,
    /// verification target (phone/email) -> code
    codes: Arc<RwLock<HashMap<String, String>>>,
}

pub fn app() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/recognition/input", post(recognize_text))
        .route("/recognition/image", post(recognize_image))
        .route("/peoples", get(list_peoples).post(create_people))
        .route("/people/{id}", get(get_people).delete(delete_people))
        .route("/people/{id}/image", put(update_people_image))
        .route("/people/{id}/remark", put(update_people_remark))
        .route("/upload/image", post(upload_image))
        .route("/user/send_code", post(send_code))
        .route("/user", post(register))
        .route("/user/login", post(login))
        .route("/user/me/login", delete(logout))
        .route("/user/me", get(me).put(update_me).delete(delete_me))
        .route("/user/me/avatar", put(upload_avatar))
        .route("/user/me/phone", put(update_phone))
        .route("/user/me/email", put(update_email))
        .with_state(AppState::default())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    tracing::info!("mock people service listening");
    axum::serve(listener, app()).await
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

type HttpError = (StatusCode, Json<Value>);

fn ok<T: Serialize>(data: T) -> Json<Value> {
    Json(json!({ "error_code": 0, "data": data }))
}

fn ok_empty() -> Json<Value> {
    Json(json!({ "error_code": 0 }))
}

fn app_error(code: i64, info: &str) -> Json<Value> {
    Json(json!({ "error_code": code, "error_info": info }))
}

fn http_error(status: StatusCode, message: &str) -> HttpError {
    (status, Json(json!({ "message": message })))
}

fn unprocessable(message: &str) -> HttpError {
    http_error(StatusCode::UNPROCESSABLE_ENTITY, message)
}

fn epoch_secs() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

/// Plain-text liveness probe; deliberately not JSON.
async fn health() -> &'static str {
    "ok"
}

// ---------------------------------------------------------------------------
// Recognition
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct RecognizeTextBody {
    text: String,
}

/// Deterministic stand-in for the extraction backend: `key: value` pairs
/// separated by commas, semicolons, or newlines become record fields, and the
/// raw text is kept under `introduction`.
fn extract_people(text: &str) -> Value {
    let mut fields = Map::new();
    for part in text.split([',', '\n', ';', '，', '；']) {
        if let Some((key, value)) = part.split_once([':', '：']) {
            let key = key.trim();
            let value = value.trim();
            if key.is_empty() || value.is_empty() {
                continue;
            }
            if let Ok(n) = value.parse::<i64>() {
                fields.insert(key.to_string(), n.into());
            } else if let Ok(f) = value.parse::<f64>() {
                fields.insert(key.to_string(), f.into());
            } else {
                fields.insert(key.to_string(), value.into());
            }
        }
    }
    fields.insert("introduction".to_string(), text.into());
    Value::Object(fields)
}

async fn recognize_text(
    Json(body): Json<RecognizeTextBody>,
) -> Result<Json<Value>, HttpError> {
    if body.text.trim().is_empty() {
        return Err(unprocessable("validation failed"));
    }
    Ok(ok(extract_people(&body.text)))
}

async fn recognize_image(multipart: Multipart) -> Result<Json<Value>, HttpError> {
    let (file_name, _bytes) = read_file_field(multipart, "image").await?;
    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(&file_name);
    Ok(ok(json!({
        "name": stem,
        "cover": format!("/uploads/{file_name}"),
    })))
}

/// Pull the first file out of a multipart body, requiring `expected_field`.
async fn read_file_field(
    mut multipart: Multipart,
    expected_field: &str,
) -> Result<(String, Vec<u8>), HttpError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| unprocessable("invalid multipart body"))?
    {
        if field.name() != Some(expected_field) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("file").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|_| unprocessable("invalid multipart body"))?;
        return Ok((file_name, bytes.to_vec()));
    }
    Err(unprocessable(&format!(
        "multipart field '{expected_field}' is required"
    )))
}

// ---------------------------------------------------------------------------
// Peoples
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct CreatePeopleBody {
    people: People,
}

async fn create_people(
    State(state): State<AppState>,
    Json(body): Json<CreatePeopleBody>,
) -> Result<Json<Value>, HttpError> {
    let mut people = body.people;
    if people.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
        return Err(unprocessable("people name is required"));
    }
    let id = Uuid::new_v4().to_string();
    people.id = Some(id.clone());
    people.created_at = Some(epoch_secs());
    state.peoples.write().await.insert(id, people.clone());
    Ok(ok(people))
}

/// Parsed form of the `/peoples` query string.
#[derive(Debug, Default, PartialEq)]
struct ListQuery {
    name: Option<String>,
    gender: Option<String>,
    age: Option<u32>,
    height: Option<f64>,
    marital_status: Option<String>,
    limit: Option<usize>,
    offset: Option<usize>,
    search: Option<String>,
    top_k: Option<usize>,
}

impl ListQuery {
    fn from_map(params: &HashMap<String, String>) -> Result<Self, String> {
        fn numeric<T: std::str::FromStr>(
            params: &HashMap<String, String>,
            key: &str,
        ) -> Result<Option<T>, String> {
            match params.get(key) {
                Some(raw) => raw
                    .parse::<T>()
                    .map(Some)
                    .map_err(|_| format!("invalid value for '{key}'")),
                None => Ok(None),
            }
        }
        Ok(Self {
            name: params.get("name").cloned(),
            gender: params.get("gender").cloned(),
            age: numeric(params, "age")?,
            height: numeric(params, "height")?,
            marital_status: params.get("marital_status").cloned(),
            limit: numeric(params, "limit")?,
            offset: numeric(params, "offset")?,
            search: params.get("search").cloned(),
            top_k: numeric(params, "top_k")?,
        })
    }

    fn matches(&self, people: &People) -> bool {
        if let Some(name) = &self.name {
            if !people.name.as_deref().unwrap_or("").contains(name.as_str()) {
                return false;
            }
        }
        if let Some(gender) = &self.gender {
            if people.gender.as_deref() != Some(gender.as_str()) {
                return false;
            }
        }
        if let Some(age) = self.age {
            if people.age != Some(age) {
                return false;
            }
        }
        if let Some(height) = self.height {
            if people.height != Some(height) {
                return false;
            }
        }
        if let Some(status) = &self.marital_status {
            if people.marital_status.as_deref() != Some(status.as_str()) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            if !people_matches_search(people, search) {
                return false;
            }
        }
        true
    }
}

/// Substring match over name, contact, and free-form string fields.
fn people_matches_search(people: &People, search: &str) -> bool {
    if people.name.as_deref().unwrap_or("").contains(search)
        || people.contact.as_deref().unwrap_or("").contains(search)
    {
        return true;
    }
    people
        .extra
        .values()
        .any(|v| v.as_str().is_some_and(|s| s.contains(search)))
}

fn apply_query(mut peoples: Vec<People>, query: &ListQuery) -> Vec<People> {
    peoples.retain(|p| query.matches(p));
    // Stable order: oldest first, id as a tiebreaker.
    peoples.sort_by(|a, b| {
        (a.created_at, a.id.as_deref()).cmp(&(b.created_at, b.id.as_deref()))
    });
    if query.search.is_some() {
        peoples.truncate(query.top_k.unwrap_or(5));
    }
    let offset = query.offset.unwrap_or(0).min(peoples.len());
    let mut peoples = peoples.split_off(offset);
    if let Some(limit) = query.limit {
        peoples.truncate(limit);
    }
    peoples
}

async fn list_peoples(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, HttpError> {
    let query = ListQuery::from_map(&params).map_err(|message| unprocessable(&message))?;
    let peoples: Vec<People> = state.peoples.read().await.values().cloned().collect();
    Ok(ok(apply_query(peoples, &query)))
}

async fn get_people(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, HttpError> {
    let peoples = state.peoples.read().await;
    peoples
        .get(&id)
        .map(ok)
        .ok_or_else(|| http_error(StatusCode::NOT_FOUND, "people not found"))
}

async fn delete_people(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, HttpError> {
    let mut peoples = state.peoples.write().await;
    peoples
        .remove(&id)
        .map(|_| ok_empty())
        .ok_or_else(|| http_error(StatusCode::NOT_FOUND, "people not found"))
}

#[derive(Deserialize)]
struct UpdateImageBody {
    image: String,
}

async fn update_people_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateImageBody>,
) -> Result<Json<Value>, HttpError> {
    let mut peoples = state.peoples.write().await;
    let people = peoples
        .get_mut(&id)
        .ok_or_else(|| http_error(StatusCode::NOT_FOUND, "people not found"))?;
    people.cover = Some(body.image);
    Ok(ok(people.clone()))
}

#[derive(Deserialize)]
struct UpdateRemarkBody {
    remark: String,
}

async fn update_people_remark(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateRemarkBody>,
) -> Result<Json<Value>, HttpError> {
    let mut peoples = state.peoples.write().await;
    let people = peoples
        .get_mut(&id)
        .ok_or_else(|| http_error(StatusCode::NOT_FOUND, "people not found"))?;
    people
        .extra
        .insert("remark".to_string(), body.remark.into());
    Ok(ok(people.clone()))
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

async fn upload_image(multipart: Multipart) -> Result<Json<Value>, HttpError> {
    let (file_name, _bytes) = read_file_field(multipart, "image").await?;
    let url = format!("/uploads/{}-{file_name}", Uuid::new_v4());
    Ok(ok(json!({ "url": url })))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct SendCodeBody {
    target_type: String,
    target: String,
    #[allow(dead_code)]
    scene: String,
}

async fn send_code(
    State(state): State<AppState>,
    Json(body): Json<SendCodeBody>,
) -> Result<Json<Value>, HttpError> {
    if body.target_type != "phone" && body.target_type != "email" {
        return Err(unprocessable("target_type must be 'phone' or 'email'"));
    }
    if body.target.trim().is_empty() {
        return Err(unprocessable("target is required"));
    }
    state
        .codes
        .write()
        .await
        .insert(body.target, VERIFICATION_CODE.to_string());
    Ok(ok_empty())
}

#[derive(Deserialize)]
struct RegisterBody {
    nickname: Option<String>,
    avatar_link: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    password: String,
    code: String,
}

async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<Json<Value>, HttpError> {
    let target = body
        .phone
        .clone()
        .or_else(|| body.email.clone())
        .ok_or_else(|| unprocessable("phone or email is required"))?;
    let codes = state.codes.read().await;
    if codes.get(&target).map(String::as_str) != Some(body.code.as_str()) {
        return Err(unprocessable("invalid verification code"));
    }
    drop(codes);

    let mut users = state.users.write().await;
    let taken = users.values().any(|stored| {
        (body.phone.is_some() && stored.user.phone == body.phone)
            || (body.email.is_some() && stored.user.email == body.email)
    });
    if taken {
        return Err(unprocessable("account already exists"));
    }

    let id = Uuid::new_v4().to_string();
    let user = UserRecord {
        nickname: body
            .nickname
            .unwrap_or_else(|| format!("user_{}", &id[..8])),
        id: id.clone(),
        phone: body.phone,
        email: body.email,
        created_at: epoch_secs().to_string(),
        avatar_link: body.avatar_link,
    };
    users.insert(
        id,
        StoredUser {
            user: user.clone(),
            password: body.password,
        },
    );
    Ok(ok(user))
}

#[derive(Deserialize)]
struct LoginBody {
    email: Option<String>,
    phone: Option<String>,
    password: String,
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, HttpError> {
    let users = state.users.read().await;
    let stored = users
        .values()
        .find(|stored| {
            (body.email.is_some() && stored.user.email == body.email)
                || (body.phone.is_some() && stored.user.phone == body.phone)
        })
        .ok_or_else(|| http_error(StatusCode::UNAUTHORIZED, "invalid credentials"))?;
    if stored.password != body.password {
        return Err(http_error(StatusCode::UNAUTHORIZED, "invalid credentials"));
    }
    let user_id = stored.user.id.clone();
    drop(users);

    let token = Uuid::new_v4().to_string();
    state.sessions.write().await.insert(token.clone(), user_id);
    let cookie = format!("session={token}; Path=/; HttpOnly");
    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        ok(json!({ "token": token })),
    ))
}

/// Resolve the session token from `Authorization: Bearer` or the `session`
/// cookie, in that order.
fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        if let Some(token) = auth.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }
    let cookies = headers.get("cookie").and_then(|v| v.to_str().ok())?;
    cookies.split(';').find_map(|pair| {
        pair.trim()
            .strip_prefix("session=")
            .map(|token| token.to_string())
    })
}

async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<(String, UserRecord), HttpError> {
    let unauthorized = || http_error(StatusCode::UNAUTHORIZED, "not logged in");
    let token = session_token(headers).ok_or_else(unauthorized)?;
    let sessions = state.sessions.read().await;
    let user_id = sessions.get(&token).cloned().ok_or_else(unauthorized)?;
    drop(sessions);
    let users = state.users.read().await;
    let user = users
        .get(&user_id)
        .map(|stored| stored.user.clone())
        .ok_or_else(unauthorized)?;
    Ok((token, user))
}

async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, HttpError> {
    let (token, _user) = authenticate(&state, &headers).await?;
    state.sessions.write().await.remove(&token);
    Ok(StatusCode::NO_CONTENT)
}

async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, HttpError> {
    let (_token, user) = authenticate(&state, &headers).await?;
    Ok(ok(user))
}

#[derive(Deserialize)]
struct UpdateUserBody {
    nickname: Option<String>,
    avatar_link: Option<String>,
    phone: Option<String>,
    email: Option<String>,
}

async fn update_me(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<UpdateUserBody>,
) -> Result<Json<Value>, HttpError> {
    let (_token, user) = authenticate(&state, &headers).await?;
    let mut users = state.users.write().await;
    let stored = users
        .get_mut(&user.id)
        .ok_or_else(|| http_error(StatusCode::UNAUTHORIZED, "not logged in"))?;
    if let Some(nickname) = body.nickname {
        stored.user.nickname = nickname;
    }
    if let Some(avatar_link) = body.avatar_link {
        stored.user.avatar_link = Some(avatar_link);
    }
    if let Some(phone) = body.phone {
        stored.user.phone = Some(phone);
    }
    if let Some(email) = body.email {
        stored.user.email = Some(email);
    }
    Ok(ok(stored.user.clone()))
}

async fn delete_me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, HttpError> {
    let (token, user) = authenticate(&state, &headers).await?;
    state.users.write().await.remove(&user.id);
    state.sessions.write().await.remove(&token);
    Ok(ok_empty())
}

async fn upload_avatar(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<Value>, HttpError> {
    let (_token, user) = authenticate(&state, &headers).await?;
    let (file_name, _bytes) = read_file_field(multipart, "avatar").await?;
    let mut users = state.users.write().await;
    let stored = users
        .get_mut(&user.id)
        .ok_or_else(|| http_error(StatusCode::UNAUTHORIZED, "not logged in"))?;
    stored.user.avatar_link = Some(format!("/uploads/{}-{file_name}", Uuid::new_v4()));
    Ok(ok(stored.user.clone()))
}

#[derive(Deserialize)]
struct UpdatePhoneBody {
    phone: String,
    code: String,
}

async fn update_phone(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<UpdatePhoneBody>,
) -> Result<Json<Value>, HttpError> {
    let (_token, user) = authenticate(&state, &headers).await?;
    let codes = state.codes.read().await;
    if codes.get(&body.phone).map(String::as_str) != Some(body.code.as_str()) {
        // Application-level rejection on a successful exchange.
        return Ok(app_error(1001, "verification code mismatch"));
    }
    drop(codes);
    let mut users = state.users.write().await;
    let stored = users
        .get_mut(&user.id)
        .ok_or_else(|| http_error(StatusCode::UNAUTHORIZED, "not logged in"))?;
    stored.user.phone = Some(body.phone);
    Ok(ok(stored.user.clone()))
}

#[derive(Deserialize)]
struct UpdateEmailBody {
    email: String,
    code: String,
}

async fn update_email(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<UpdateEmailBody>,
) -> Result<Json<Value>, HttpError> {
    let (_token, user) = authenticate(&state, &headers).await?;
    let codes = state.codes.read().await;
    if codes.get(&body.email).map(String::as_str) != Some(body.code.as_str()) {
        return Ok(app_error(1001, "verification code mismatch"));
    }
    drop(codes);
    let mut users = state.users.write().await;
    let stored = users
        .get_mut(&user.id)
        .ok_or_else(|| http_error(StatusCode::UNAUTHORIZED, "not logged in"))?;
    stored.user.email = Some(body.email);
    Ok(ok(stored.user.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(name: &str, age: u32, created_at: i64) -> People {
        People {
            id: Some(format!("id-{name}")),
            name: Some(name.to_string()),
            age: Some(age),
            created_at: Some(created_at),
            ..Default::default()
        }
    }

    #[test]
    fn extract_people_parses_key_value_pairs() {
        let value = extract_people("name: Zhang San, age: 30, height: 1.75");
        assert_eq!(value["name"], "Zhang San");
        assert_eq!(value["age"], 30);
        assert_eq!(value["height"], 1.75);
        assert_eq!(value["introduction"], "name: Zhang San, age: 30, height: 1.75");
    }

    #[test]
    fn extract_people_without_pairs_keeps_introduction_only() {
        let value = extract_people("just a plain sentence");
        assert_eq!(value["introduction"], "just a plain sentence");
        assert!(value.get("name").is_none());
    }

    #[test]
    fn list_query_rejects_non_numeric_age() {
        let mut params = HashMap::new();
        params.insert("age".to_string(), "thirty".to_string());
        assert!(ListQuery::from_map(&params).is_err());
    }

    #[test]
    fn list_query_parses_mixed_params() {
        let mut params = HashMap::new();
        params.insert("search".to_string(), "Zhang".to_string());
        params.insert("top_k".to_string(), "5".to_string());
        let query = ListQuery::from_map(&params).unwrap();
        assert_eq!(query.search.as_deref(), Some("Zhang"));
        assert_eq!(query.top_k, Some(5));
        assert_eq!(query.age, None);
    }

    #[test]
    fn filters_match_on_name_substring_and_age() {
        let query = ListQuery {
            name: Some("Zhang".to_string()),
            age: Some(30),
            ..Default::default()
        };
        assert!(query.matches(&person("Zhang San", 30, 1)));
        assert!(!query.matches(&person("Zhang San", 31, 1)));
        assert!(!query.matches(&person("Li Si", 30, 1)));
    }

    #[test]
    fn search_matches_free_form_fields() {
        let mut p = person("Li Si", 28, 1);
        p.extra
            .insert("occupation".to_string(), "tea merchant".into());
        assert!(people_matches_search(&p, "merchant"));
        assert!(!people_matches_search(&p, "engineer"));
    }

    #[test]
    fn apply_query_orders_and_paginates() {
        let peoples = vec![
            person("b", 20, 2),
            person("a", 20, 1),
            person("c", 20, 3),
        ];
        let query = ListQuery {
            offset: Some(1),
            limit: Some(1),
            ..Default::default()
        };
        let result = apply_query(peoples, &query);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name.as_deref(), Some("b"));
    }

    #[test]
    fn apply_query_caps_search_results_at_top_k() {
        let peoples = vec![
            person("Zhang 1", 20, 1),
            person("Zhang 2", 20, 2),
            person("Zhang 3", 20, 3),
        ];
        let query = ListQuery {
            search: Some("Zhang".to_string()),
            top_k: Some(2),
            ..Default::default()
        };
        assert_eq!(apply_query(peoples, &query).len(), 2);
    }

    #[test]
    fn people_round_trips_with_free_form_fields() {
        let json = r#"{"name":"Wang Wu","hobby":"calligraphy"}"#;
        let people: People = serde_json::from_str(json).unwrap();
        assert_eq!(people.extra["hobby"], "calligraphy");
        let back = serde_json::to_value(&people).unwrap();
        assert_eq!(back["hobby"], "calligraphy");
    }
}
