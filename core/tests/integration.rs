//! API-surface tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every client
//! operation over real HTTP: people records, recognition intake, image
//! upload, and the account lifecycle. Pipeline-contract tests (timeouts,
//! error interpretation, concurrency) live in `pipeline.rs`.

use std::sync::{Arc, Mutex};

use people_client::{
    ApiClient, ApiConfig, CodeScene, Envelope, FilePayload, LoginRequest, People, PeopleQuery,
    RegisterRequest, SendCodeRequest, TargetType, UpdatePhoneRequest, UpdateUserRequest,
};

async fn spawn_mock() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        mock_server::run(listener).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(ApiConfig::new(base_url)).unwrap()
}

fn sample_people(name: &str, age: u32) -> People {
    let mut people = People {
        name: Some(name.to_string()),
        age: Some(age),
        gender: Some("female".to_string()),
        ..Default::default()
    };
    people
        .extra
        .insert("occupation".to_string(), "engineer".into());
    people
}

#[tokio::test]
async fn people_crud_lifecycle() {
    let base = spawn_mock().await;
    let client = client(&base);

    // Create: server assigns id and created_at, free-form fields survive.
    let created = client
        .create_people(&sample_people("Zhang San", 30))
        .await
        .unwrap();
    assert!(created.ok());
    let created = created.data.unwrap();
    let id = created.id.clone().unwrap();
    assert!(created.created_at.is_some());
    assert_eq!(created.extra["occupation"], "engineer");

    // Fetch it back.
    let fetched = client.get_people(&id).await.unwrap().data.unwrap();
    assert_eq!(fetched.name.as_deref(), Some("Zhang San"));
    assert_eq!(fetched.extra["occupation"], "engineer");

    // Filtered listing.
    let query = PeopleQuery {
        name: Some("Zhang".to_string()),
        ..Default::default()
    };
    let listed = client.list_peoples(&query).await.unwrap().data.unwrap();
    assert_eq!(listed.len(), 1);

    let query = PeopleQuery {
        age: Some(99),
        ..Default::default()
    };
    let listed = client.filter_peoples(query).await.unwrap().data.unwrap();
    assert!(listed.is_empty());

    // Sub-resource updates.
    let updated = client
        .update_people_image(&id, "/uploads/cover.png")
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(updated.cover.as_deref(), Some("/uploads/cover.png"));

    let updated = client
        .update_people_remark(&id, "met at the fair")
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(updated.extra["remark"], "met at the fair");

    // Delete, then confirm it is gone.
    assert!(client.delete_people(&id).await.unwrap().ok());
    let err = client.get_people(&id).await.unwrap_err();
    assert_eq!(err.status, Some(404));
    assert_eq!(err.message, "people not found");
}

#[tokio::test]
async fn search_respects_top_k() {
    let base = spawn_mock().await;
    let client = client(&base);

    for i in 1..=3 {
        client
            .create_people(&sample_people(&format!("Zhang {i}"), 20 + i))
            .await
            .unwrap();
    }
    client
        .create_people(&sample_people("Li Si", 40))
        .await
        .unwrap();

    let hits = client
        .search_peoples("Zhang", 2)
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(hits.len(), 2);

    let all = client
        .list_peoples(&PeopleQuery::default())
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(all.len(), 4);
}

#[tokio::test]
async fn create_people_without_name_is_rejected() {
    let base = spawn_mock().await;
    let client = client(&base);

    let err = client.create_people(&People::default()).await.unwrap_err();
    assert_eq!(err.status, Some(422));
    assert_eq!(err.message, "people name is required");
}

#[tokio::test]
async fn batch_reports_per_item_outcomes() {
    let base = spawn_mock().await;
    let client = client(&base);

    let batch = vec![
        sample_people("Wang Wu", 25),
        People::default(), // no name, rejected by the server
        sample_people("Zhao Liu", 35),
    ];
    let results = client.create_peoples_batch(&batch).await;
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[2].is_ok());
    let err = results[1].as_ref().unwrap_err();
    assert_eq!(err.status, Some(422));
}

#[tokio::test]
async fn recognize_text_extracts_structured_fields() {
    let base = spawn_mock().await;
    let client = client(&base);

    let envelope = client
        .recognize_text("name: Zhao Liu, age: 41")
        .await
        .unwrap();
    assert!(envelope.ok());
    let people = envelope.data.unwrap();
    assert_eq!(people.name.as_deref(), Some("Zhao Liu"));
    assert_eq!(people.age, Some(41));
    assert!(people.extra.contains_key("introduction"));
}

#[tokio::test]
async fn recognize_image_extracts_from_file() {
    let base = spawn_mock().await;
    let client = client(&base);

    let file = FilePayload::new("portrait.png", "image/png", vec![0u8; 128]);
    let people = client.recognize_image(file).await.unwrap().data.unwrap();
    assert_eq!(people.name.as_deref(), Some("portrait"));
    assert_eq!(people.cover.as_deref(), Some("/uploads/portrait.png"));
}

#[tokio::test]
async fn recognize_image_rejects_non_images_locally() {
    let base = spawn_mock().await;
    let client = client(&base);

    let file = FilePayload::new("notes.txt", "text/plain", vec![1, 2, 3]);
    let err = client.recognize_image(file).await.unwrap_err();
    assert!(err.message.contains("only image files"));
    // Rejected before dispatch, so no HTTP status.
    assert_eq!(err.status, None);
}

#[tokio::test]
async fn upload_image_returns_a_url() {
    let base = spawn_mock().await;
    let client = client(&base);

    let file = FilePayload::new("photo.jpg", "image/jpeg", vec![0u8; 1024]);
    let uploaded = client.upload_image(file).await.unwrap().data.unwrap();
    assert!(uploaded.url.starts_with("/uploads/"));
    assert!(uploaded.url.ends_with("photo.jpg"));
}

#[tokio::test]
async fn upload_image_reports_progress() {
    let base = spawn_mock().await;
    let client = client(&base);

    let total_bytes = 200_000u64;
    let file = FilePayload::new("big.png", "image/png", vec![0u8; total_bytes as usize]);
    let seen: Arc<Mutex<Vec<(u64, u64)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let envelope = client
        .upload_image_with_progress(file, move |sent, total| {
            sink.lock().unwrap().push((sent, total));
        })
        .await
        .unwrap();
    assert!(envelope.ok());

    let seen = seen.lock().unwrap();
    assert!(seen.len() > 1, "expected chunked progress reports");
    assert!(seen.windows(2).all(|w| w[0].0 <= w[1].0));
    assert_eq!(*seen.last().unwrap(), (total_bytes, total_bytes));
}

#[tokio::test]
async fn account_lifecycle() {
    let base = spawn_mock().await;
    let client = client(&base);

    // Verification code, then registration.
    client
        .send_code(&SendCodeRequest {
            target_type: TargetType::Email,
            target: "zhang@example.com".to_string(),
            scene: CodeScene::Register,
        })
        .await
        .unwrap();
    let registered = client
        .register(&RegisterRequest {
            nickname: Some("Zhang".to_string()),
            email: Some("zhang@example.com".to_string()),
            password: "secret".to_string(),
            code: mock_server::VERIFICATION_CODE.to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(registered.ok());

    // Login stores the token; auth rides on the session cookie.
    let login = client
        .login(&LoginRequest {
            email: Some("zhang@example.com".to_string()),
            password: "secret".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    let token = login.data.unwrap().token;
    assert_eq!(client.session().token(), Some(token));

    let user = client.me().await.unwrap().data.unwrap();
    assert_eq!(user.nickname, "Zhang");

    let user = client
        .update_me(&UpdateUserRequest {
            nickname: Some("Zhang San".to_string()),
            ..Default::default()
        })
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(user.nickname, "Zhang San");

    // Avatar upload (multipart PUT).
    let avatar = FilePayload::new("avatar.png", "image/png", vec![0u8; 256]);
    let user = client.upload_avatar(avatar).await.unwrap().data.unwrap();
    assert!(user.avatar_link.is_some());

    // Phone update with a stale code fails in-band, not as an HTTP error.
    let rejected = client
        .update_phone(&UpdatePhoneRequest {
            phone: "13800000000".to_string(),
            code: "000000".to_string(),
        })
        .await
        .unwrap();
    assert!(!rejected.ok());
    assert_eq!(
        rejected.error_info.as_deref(),
        Some("verification code mismatch")
    );

    // With a fresh code it succeeds.
    client
        .send_code(&SendCodeRequest {
            target_type: TargetType::Phone,
            target: "13800000000".to_string(),
            scene: CodeScene::Update,
        })
        .await
        .unwrap();
    let user = client
        .update_phone(&UpdatePhoneRequest {
            phone: "13800000000".to_string(),
            code: mock_server::VERIFICATION_CODE.to_string(),
        })
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(user.phone.as_deref(), Some("13800000000"));

    // Logout: 204 surfaces as an empty envelope, session is cleared.
    let envelope = client.logout().await.unwrap();
    assert_eq!(envelope, Envelope::default());
    assert!(client.session().token().is_none());

    let err = client.me().await.unwrap_err();
    assert_eq!(err.status, Some(401));
    assert_eq!(err.message, "not logged in");
}

#[tokio::test]
async fn register_with_wrong_code_is_rejected() {
    let base = spawn_mock().await;
    let client = client(&base);

    client
        .send_code(&SendCodeRequest {
            target_type: TargetType::Phone,
            target: "13900000000".to_string(),
            scene: CodeScene::Register,
        })
        .await
        .unwrap();
    let err = client
        .register(&RegisterRequest {
            phone: Some("13900000000".to_string()),
            password: "secret".to_string(),
            code: "999999".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.status, Some(422));
    assert_eq!(err.message, "invalid verification code");
}

#[tokio::test]
async fn login_with_wrong_password_is_rejected() {
    let base = spawn_mock().await;
    let client = client(&base);

    client
        .send_code(&SendCodeRequest {
            target_type: TargetType::Email,
            target: "li@example.com".to_string(),
            scene: CodeScene::Register,
        })
        .await
        .unwrap();
    client
        .register(&RegisterRequest {
            email: Some("li@example.com".to_string()),
            password: "right".to_string(),
            code: mock_server::VERIFICATION_CODE.to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let err = client
        .login(&LoginRequest {
            email: Some("li@example.com".to_string()),
            password: "wrong".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.status, Some(401));
    assert_eq!(err.message, "invalid credentials");
    assert!(client.session().token().is_none());
}
