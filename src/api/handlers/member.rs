use crate::api::dtos::requests::{MemberQuery, UpdateMemberRequest};
use crate::domain::models::member::{none_if_blank, AddressUpdate};
use crate::domain::services::{expiry, token};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Resolves an edit link. The live lookup checks token and expiry in one
/// query; on a miss a second, informational lookup decides whether the
/// caller sees "expired" or "not found".
pub async fn get_member(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MemberQuery>,
) -> Result<impl IntoResponse, AppError> {
    let token = query
        .token
        .ok_or_else(|| AppError::Validation("Missing token".to_string()))?;

    if !token::is_valid_format(&token) {
        return Err(AppError::Validation("Invalid token format".to_string()));
    }

    let now = Utc::now();
    let member = match state.member_repo.find_by_token_live(&token, now).await? {
        Some(member) => member,
        None => return Err(dead_token_error(&state, &token).await?),
    };

    Ok(Json(json!({
        "member": member,
        "remaining_validity": expiry::format_remaining_validity(member.expiry_date, now),
    })))
}

pub async fn update_member(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpdateMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !token::is_valid_format(&payload.token) {
        return Err(AppError::Validation("Invalid token format".to_string()));
    }

    let street = payload.street.trim().to_string();
    let postal_code = payload.postal_code.trim().to_string();
    let city = payload.city.trim().to_string();
    if street.is_empty() || postal_code.is_empty() || city.is_empty() {
        return Err(AppError::Validation(
            "Street, postal code and city must not be empty".to_string(),
        ));
    }

    let now = Utc::now();
    if state
        .member_repo
        .find_by_token_live(&payload.token, now)
        .await?
        .is_none()
    {
        return Err(dead_token_error(&state, &payload.token).await?);
    }

    let update = AddressUpdate {
        street,
        postal_code,
        city,
        email: payload.email.and_then(none_if_blank),
        phone: payload.phone.and_then(none_if_blank),
        mobile: payload.mobile.and_then(none_if_blank),
        communication_preference: payload.communication_preference.and_then(none_if_blank),
        notes: payload.notes.unwrap_or_default(),
    };

    // The statement re-checks the expiry predicate, so a link that ran out
    // between render and submit lands here with zero rows affected.
    let affected = state
        .member_repo
        .update_address(&payload.token, &update, now)
        .await?;
    if affected == 0 {
        return Err(AppError::LinkExpired);
    }

    let member = state
        .member_repo
        .find_by_token(&payload.token)
        .await?
        .ok_or_else(|| AppError::NotFound("Token not found or expired".to_string()))?;

    info!("Member {} updated their address", member.customer_number);

    Ok(Json(json!({ "member": member })))
}

async fn dead_token_error(state: &AppState, token: &str) -> Result<AppError, AppError> {
    Ok(match state.member_repo.find_by_token(token).await? {
        Some(_) => AppError::LinkExpired,
        None => AppError::NotFound("Token not found or expired".to_string()),
    })
}
