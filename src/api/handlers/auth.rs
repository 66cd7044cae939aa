use crate::api::dtos::requests::LoginRequest;
use crate::domain::services::auth_service::{SESSION_COOKIE, SESSION_HOURS};
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;
use time::Duration;
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies};
use tracing::info;

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !state
        .auth_service
        .verify_credentials(&payload.username, &payload.password)
    {
        return Err(AppError::Unauthorized);
    }

    let session = state.auth_service.issue_session()?;

    let mut cookie = Cookie::new(SESSION_COOKIE, session);
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_path("/");
    cookie.set_max_age(Duration::hours(SESSION_HOURS));
    cookies.add(cookie);

    info!("Admin logged in");

    Ok(Json(json!({ "success": true })))
}

pub async fn logout(cookies: Cookies) -> Result<impl IntoResponse, AppError> {
    cookies.remove(Cookie::build((SESSION_COOKIE, "")).path("/").into());

    info!("Admin logged out");

    Ok(StatusCode::OK)
}
