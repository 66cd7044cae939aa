use axum::{
    body::Body,
    extract::{DefaultBodyLimit, Request},
    routing::{delete, get, post},
    Router,
};
use crate::api::handlers::{admin, auth, export, health, import, member};
use crate::state::AppState;
use std::sync::Arc;
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout))

        // Member self-service (token-gated, no session)
        .route("/api/v1/member", get(member::get_member))
        .route("/api/v1/member/update", post(member::update_member))

        // Admin roster
        .route("/api/v1/admin/members", get(admin::list_members))
        .route("/api/v1/admin/members/count", get(admin::count_members))
        .route("/api/v1/admin/members/export", get(export::export_members))
        .route("/api/v1/admin/members/renew-all", post(admin::renew_all))
        .route("/api/v1/admin/members/delete-all", post(admin::delete_all))
        .route("/api/v1/admin/members/{id}", delete(admin::delete_member))
        .route("/api/v1/admin/members/{id}/renew", post(admin::renew_member))
        .route("/api/v1/admin/members/{id}/invalidate", post(admin::invalidate_member))

        // Import
        .route("/api/v1/admin/import/preview", post(import::preview))
        .route("/api/v1/admin/import", post(import::commit))

        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
