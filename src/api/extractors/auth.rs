use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use crate::domain::services::auth_service::SESSION_COOKIE;
use crate::state::AppState;
use std::sync::Arc;
use tower_cookies::Cookies;

/// Proof that the request carries a valid admin session cookie.
pub struct AdminSession;

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let cookies = parts.extensions.get::<Cookies>()
            .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

        let session = cookies.get(SESSION_COOKIE)
            .ok_or(StatusCode::UNAUTHORIZED)?
            .value()
            .to_string();

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        if !app_state.auth_service.verify_session(&session) {
            return Err(StatusCode::UNAUTHORIZED);
        }

        Ok(AdminSession)
    }
}
