use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use chrono::{DateTime, Duration, Utc};
use member_portal_backend::{
    api::router::create_router,
    config::Config,
    domain::models::member::{Member, MemberImport},
    domain::ports::MemberRepository,
    domain::services::auth_service::AuthService,
    infra::repositories::sqlite_member_repo::SqliteMemberRepo,
    state::AppState,
};
use serde_json::Value;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_ADMIN_PASSWORD: &str = "test-admin-password";

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            admin_username: "admin".to_string(),
            admin_password: TEST_ADMIN_PASSWORD.to_string(),
            session_secret: "test-session-secret".to_string(),
            public_base_url: "http://localhost:3000".to_string(),
        };

        let auth_service = Arc::new(AuthService::new(&config));

        let state = Arc::new(AppState {
            config,
            member_repo: Arc::new(SqliteMemberRepo::new(pool.clone())),
            auth_service,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// Logs in as the test admin and returns the session cookie value.
    pub async fn login(&self) -> String {
        let payload = serde_json::json!({
            "username": "admin",
            "password": TEST_ADMIN_PASSWORD,
        });

        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let cookie = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|h| h.to_str().unwrap().to_string())
            .find(|c| c.contains("admin_session="))
            .expect("No admin_session cookie returned");

        let start = cookie.find("admin_session=").unwrap() + "admin_session=".len();
        let end = cookie[start..].find(';').unwrap_or(cookie.len() - start);
        cookie[start..start + end].to_string()
    }

    /// Seeds one member with a fresh token and the given validity window.
    pub async fn seed_member(&self, customer_number: &str, valid_for: Duration) -> Member {
        let import = MemberImport {
            customer_number: customer_number.to_string(),
            salutation: "Herr".to_string(),
            first_name: "Max".to_string(),
            last_name: "Mustermann".to_string(),
            street: "Hauptstraße 1".to_string(),
            postal_code: "80331".to_string(),
            city: "München".to_string(),
            email: "max@example.org".to_string(),
            ..Default::default()
        };

        let mut member = Member::from_import(import, Utc::now());
        member.expiry_date = Utc::now() + valid_for;
        self.state
            .member_repo
            .insert(&member)
            .await
            .expect("Failed to seed member")
    }

    pub async fn set_expiry(&self, customer_number: &str, expiry: DateTime<Utc>) {
        self.state
            .member_repo
            .set_expiry(customer_number, expiry)
            .await
            .expect("Failed to set expiry");
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

#[allow(dead_code)]
pub async fn body_json(response: axum::http::Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub async fn body_bytes(response: axum::http::Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

/// Builds a GET request carrying the admin session cookie.
#[allow(dead_code)]
pub fn admin_get(uri: &str, session: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::COOKIE, format!("admin_session={}", session))
        .body(Body::empty())
        .unwrap()
}

/// Builds a JSON POST request carrying the admin session cookie.
#[allow(dead_code)]
pub fn admin_post(uri: &str, session: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, format!("admin_session={}", session))
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[allow(dead_code)]
pub fn admin_delete(uri: &str, session: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::COOKIE, format!("admin_session={}", session))
        .body(Body::empty())
        .unwrap()
}

/// Builds a multipart upload request for the import preview endpoint.
#[allow(dead_code)]
pub fn upload_request(uri: &str, session: &str, filename: &str, data: &[u8]) -> Request<Body> {
    let boundary = "test-boundary-1234567890";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .header(header::COOKIE, format!("admin_session={}", session))
        .body(Body::from(body))
        .unwrap()
}
