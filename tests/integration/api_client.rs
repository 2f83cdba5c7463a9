//! Integration tests for the API client: bearer attachment, error
//! normalization, multipart upload, and the pass-through team and
//! notification endpoints.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod support;

use std::sync::atomic::Ordering;

use reqwest::StatusCode;

use taskdeck::api::{ApiClient, ApiConfig, ApiError};
use taskdeck::credentials::{MemoryTokenStore, TokenStore};
use taskdeck_model::task::{TaskDraft, TaskId, TaskStatus};
use taskdeck_model::team::TeamDraft;
use taskdeck_model::user::UserId;

use support::VALID_TOKEN;

// ---------------------------------------------------------------------------
// Token attachment
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bearer_header_attached_when_token_present() {
    let server = support::start().await;
    let (api, credentials) = support::make_client(&server);
    credentials.save("tok-x").await.unwrap();

    api.list_tasks(&[]).await.unwrap();

    assert_eq!(
        server.state.last_auth.lock().as_deref(),
        Some("Bearer tok-x")
    );
}

#[tokio::test]
async fn no_auth_header_when_logged_out() {
    let server = support::start().await;
    let (api, _credentials) = support::make_client(&server);

    // Absence of a token means an unauthenticated request, not a failure.
    api.list_tasks(&[]).await.unwrap();

    assert_eq!(server.state.last_auth.lock().as_deref(), None);
}

#[tokio::test]
async fn explicit_token_overrides_the_store() {
    let server = support::start().await;
    let (api, credentials) = support::make_client(&server);
    // The store is empty; the override token is supplied directly, as
    // during session restoration.
    assert_eq!(credentials.load().await.unwrap(), None);

    let user = api.current_user_with_token(VALID_TOKEN).await.unwrap();

    assert_eq!(user.email, support::VALID_EMAIL);
    assert_eq!(
        server.state.last_auth.lock().as_deref(),
        Some(format!("Bearer {VALID_TOKEN}").as_str())
    );
}

#[tokio::test]
async fn current_user_reads_the_stored_token() {
    let server = support::start().await;
    let (api, credentials) = support::make_client(&server);
    credentials.save(VALID_TOKEN).await.unwrap();

    let user = api.current_user().await.unwrap();
    assert_eq!(user.email, support::VALID_EMAIL);
}

// ---------------------------------------------------------------------------
// Error normalization
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_success_status_carries_server_message() {
    let server = support::start().await;
    let (api, _credentials) = support::make_client(&server);

    let err = api.get_task(&TaskId::new("ghost")).await.unwrap_err();

    match err {
        ApiError::Api { status, message } => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(message, "task not found");
        }
        other => panic!("expected ApiError::Api, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_error_body_falls_back_to_generic_message() {
    let server = support::start().await;
    server.state.fail_plain.store(true, Ordering::SeqCst);
    let (api, _credentials) = support::make_client(&server);

    let err = api.list_tasks(&[]).await.unwrap_err();

    match err {
        ApiError::Api { status, message } => {
            assert_eq!(status, StatusCode::BAD_GATEWAY);
            assert_eq!(message, "API request failed");
        }
        other => panic!("expected ApiError::Api, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Bind and immediately drop a listener so the port refuses connections.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = ApiClient::new(
        &ApiConfig::new(format!("http://{addr}")),
        std::sync::Arc::new(MemoryTokenStore::new()),
    )
    .unwrap();

    let err = api.list_tasks(&[]).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn empty_success_body_is_fine() {
    let server = support::start().await;
    let (api, _credentials) = support::make_client(&server);

    let created = api.create_task(&TaskDraft::titled("Short-lived")).await.unwrap();
    // The mock answers the delete with an empty 200 body.
    api.delete_task(&created.id).await.unwrap();

    let err = api.get_task(&created.id).await.unwrap_err();
    assert!(matches!(err, ApiError::Api { status, .. } if status == StatusCode::NOT_FOUND));
}

// ---------------------------------------------------------------------------
// Query pass-through
// ---------------------------------------------------------------------------

#[tokio::test]
async fn filters_pass_through_unvalidated() {
    let server = support::start().await;
    let (api, _credentials) = support::make_client(&server);

    let filters = vec![
        ("status".to_string(), "pending".to_string()),
        ("made_up_filter".to_string(), "whatever".to_string()),
    ];
    api.list_tasks(&filters).await.unwrap();

    assert_eq!(server.state.last_query.lock().clone(), Some(filters));
}

#[tokio::test]
async fn no_filters_means_no_query_pairs() {
    let server = support::start().await;
    let (api, _credentials) = support::make_client(&server);

    api.list_tasks(&[]).await.unwrap();

    assert_eq!(server.state.last_query.lock().clone(), Some(Vec::new()));
}

// ---------------------------------------------------------------------------
// Multipart photo upload
// ---------------------------------------------------------------------------

#[tokio::test]
async fn photo_upload_sends_multipart_photo_field() {
    let server = support::start().await;
    server.state.seed_task("t1", "Photogenic", TaskStatus::Pending);
    let (api, _credentials) = support::make_client(&server);

    let photo = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
    let task = api
        .upload_task_photo(&TaskId::new("t1"), photo.clone())
        .await
        .unwrap();

    assert_eq!(
        task.photo_url.as_deref(),
        Some("https://cdn.example.com/photos/t1.jpg")
    );
    let recorded = server.state.last_photo.lock().clone();
    assert_eq!(
        recorded,
        Some(("photo".to_string(), "task-photo.jpg".to_string(), photo.len()))
    );
}

#[tokio::test]
async fn photo_upload_for_unknown_task_surfaces_server_message() {
    let server = support::start().await;
    let (api, _credentials) = support::make_client(&server);

    let err = api
        .upload_task_photo(&TaskId::new("ghost"), vec![1, 2, 3])
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Api { status, .. } if status == StatusCode::NOT_FOUND));
}

// ---------------------------------------------------------------------------
// Teams (stateless pass-through)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn team_round_trip() {
    let server = support::start().await;
    let (api, _credentials) = support::make_client(&server);

    let team = api
        .create_team(&TeamDraft {
            name: "Field crew".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(team.name, "Field crew");
    assert!(team.members.is_empty());

    let teams = api.list_teams().await.unwrap();
    assert_eq!(teams.len(), 1);

    let team = api
        .add_team_member(&team.id, &UserId::new("u7"))
        .await
        .unwrap();
    assert_eq!(team.members, vec![UserId::new("u7")]);

    let members = api.team_members(&team.id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].id, UserId::new("u7"));
}

// ---------------------------------------------------------------------------
// Notifications (fire-and-forget)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn notifications_post_task_and_recipient() {
    let server = support::start().await;
    let (api, _credentials) = support::make_client(&server);

    api.send_email_notification(&TaskId::new("t1"), &UserId::new("u2"))
        .await
        .unwrap();
    api.send_sms_notification(&TaskId::new("t1"), &UserId::new("u2"))
        .await
        .unwrap();

    assert_eq!(server.state.emails_sent.load(Ordering::SeqCst), 1);
    assert_eq!(server.state.sms_sent.load(Ordering::SeqCst), 1);
}
