mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Duration, Utc};
use common::{body_json, TestApp};
use member_portal_backend::domain::ports::MemberRepository;
use serde_json::json;
use tower::ServiceExt;

fn get_member(token: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/api/v1/member?token={}", token))
        .body(Body::empty())
        .unwrap()
}

fn post_update(payload: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/member/update")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_get_member_requires_token() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/member")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_member_rejects_malformed_token() {
    let app = TestApp::new().await;

    // Too short, and uppercase characters outside the token alphabet.
    for bad in ["short", "ABCDEFGHIJKLMNOPQRSTUVWX"] {
        let response = app.router.clone().oneshot(get_member(bad)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_get_member_unknown_token_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(get_member("abcdefghij0123456789abcd"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_member_expired_token_is_forbidden() {
    let app = TestApp::new().await;
    let member = app.seed_member("1001", Duration::weeks(4)).await;
    app.set_expiry("1001", Utc::now() - Duration::days(1)).await;

    let response = app
        .router
        .clone()
        .oneshot(get_member(&member.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_get_member_returns_data_and_remaining_validity() {
    let app = TestApp::new().await;
    let member = app.seed_member("1001", Duration::days(3)).await;

    let response = app
        .router
        .clone()
        .oneshot(get_member(&member.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["member"]["customer_number"], "1001");
    assert_eq!(body["member"]["street"], "Hauptstraße 1");
    assert_eq!(body["remaining_validity"], "in 3 days");
}

#[tokio::test]
async fn test_update_rejects_blank_address_fields() {
    let app = TestApp::new().await;
    let member = app.seed_member("1001", Duration::weeks(4)).await;

    let payload = json!({
        "token": member.token,
        "street": "Neue Straße 5",
        "postal_code": "   ",
        "city": "Berlin",
    });
    let response = app
        .router
        .clone()
        .oneshot(post_update(&payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_snapshots_original_address_once() {
    let app = TestApp::new().await;
    let member = app.seed_member("1001", Duration::weeks(4)).await;

    let payload = json!({
        "token": member.token,
        "street": "Neue Straße 5",
        "postal_code": "10115",
        "city": "Berlin",
        "email": "neu@example.org",
        "notes": "Umzug im August",
    });
    let response = app
        .router
        .clone()
        .oneshot(post_update(&payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["member"]["modified"], true);
    assert_eq!(body["member"]["street"], "Neue Straße 5");
    assert_eq!(body["member"]["original_street"], "Hauptstraße 1");
    assert_eq!(body["member"]["original_postal_code"], "80331");
    assert_eq!(body["member"]["original_city"], "München");
    assert_eq!(body["member"]["notes"], "Umzug im August");

    // A second edit must not overwrite the first snapshot.
    let payload = json!({
        "token": member.token,
        "street": "Dritte Straße 9",
        "postal_code": "20095",
        "city": "Hamburg",
    });
    let response = app
        .router
        .clone()
        .oneshot(post_update(&payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["member"]["street"], "Dritte Straße 9");
    assert_eq!(body["member"]["original_street"], "Hauptstraße 1");
    assert_eq!(body["member"]["original_city"], "München");
}

#[tokio::test]
async fn test_update_blank_contact_fields_become_null() {
    let app = TestApp::new().await;
    let member = app.seed_member("1001", Duration::weeks(4)).await;

    let payload = json!({
        "token": member.token,
        "street": "Neue Straße 5",
        "postal_code": "10115",
        "city": "Berlin",
        "email": "   ",
        "phone": "089 123456",
    });
    let response = app
        .router
        .clone()
        .oneshot(post_update(&payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["member"]["email"].is_null());
    assert_eq!(body["member"]["phone"], "089 123456");
}

#[tokio::test]
async fn test_update_with_expired_token_is_forbidden() {
    let app = TestApp::new().await;
    let member = app.seed_member("1001", Duration::weeks(4)).await;
    app.set_expiry("1001", Utc::now() - Duration::seconds(1)).await;

    let payload = json!({
        "token": member.token,
        "street": "Neue Straße 5",
        "postal_code": "10115",
        "city": "Berlin",
    });
    let response = app
        .router
        .clone()
        .oneshot(post_update(&payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Nothing was written.
    let stored = app
        .state
        .member_repo
        .find_by_customer_number("1001")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.street, "Hauptstraße 1");
    assert!(!stored.modified);
}
