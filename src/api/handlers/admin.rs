use crate::api::dtos::requests::{DeleteAllRequest, ListMembersQuery, RenewRequest};
use crate::api::dtos::responses::{BulkRenewReport, MemberPageResponse};
use crate::api::extractors::auth::AdminSession;
use crate::domain::services::expiry::{self, RENEWAL_PRESET_WEEKS};
use crate::domain::services::table_view::{self, SortKey, TableQuery};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const PAGE_SIZE: i64 = 50;

/// Bulk operations walk the roster in windows of this size.
const BULK_WINDOW: i64 = 1000;

/// The delete-all confirmation phrase the admin has to type verbatim.
const DELETE_ALL_PHRASE: &str = "LÖSCHEN";

pub async fn list_members(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListMembersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page as i64 - 1) * PAGE_SIZE;

    let members = state.member_repo.list_page(PAGE_SIZE, offset).await?;
    let total_count = state.member_repo.count().await?;

    let table_query = TableQuery {
        search: query.search,
        sort: query
            .sort
            .as_deref()
            .and_then(SortKey::parse)
            .unwrap_or_default(),
        descending: query.order.as_deref() == Some("desc"),
    };
    let members = table_view::filter_and_sort(members, &table_query, Utc::now());

    Ok(Json(MemberPageResponse {
        members,
        total_count,
        page,
        page_size: PAGE_SIZE,
    }))
}

pub async fn count_members(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let count = state.member_repo.count().await?;
    Ok(Json(json!({ "count": count })))
}

pub async fn renew_member(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Path(customer_number): Path<String>,
    Json(payload): Json<RenewRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_preset(payload.weeks)?;

    let expiry = expiry::expiry_after_weeks(Utc::now(), payload.weeks);
    state
        .member_repo
        .set_expiry(&customer_number, expiry)
        .await?;

    let member = state
        .member_repo
        .find_by_customer_number(&customer_number)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Member not found: {}", customer_number)))?;

    info!(
        "Renewed link for member {} by {} weeks",
        customer_number, payload.weeks
    );

    Ok(Json(json!({ "member": member })))
}

/// Moves the expiry into the past, killing the edit link without touching
/// the token itself. A later renew revives the same link.
pub async fn invalidate_member(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Path(customer_number): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state
        .member_repo
        .set_expiry(&customer_number, DateTime::<Utc>::UNIX_EPOCH)
        .await?;

    info!("Invalidated link for member {}", customer_number);

    Ok(StatusCode::OK)
}

/// Renews every member's link. Unlike import, a failing row is logged and
/// skipped so one bad record cannot block the rest of the roster.
pub async fn renew_all(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RenewRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_preset(payload.weeks)?;

    let expiry = expiry::expiry_after_weeks(Utc::now(), payload.weeks);
    let mut updated = 0usize;
    let mut total = 0usize;
    let mut offset = 0i64;

    loop {
        let batch = state
            .member_repo
            .list_customer_numbers(BULK_WINDOW, offset)
            .await?;
        if batch.is_empty() {
            break;
        }

        for customer_number in &batch {
            total += 1;
            match state.member_repo.set_expiry(customer_number, expiry).await {
                Ok(()) => updated += 1,
                Err(e) => error!("Failed to renew member {}: {}", customer_number, e),
            }
        }

        if (batch.len() as i64) < BULK_WINDOW {
            break;
        }
        offset += BULK_WINDOW;
    }

    info!("Bulk renew finished: {}/{} members updated", updated, total);

    Ok(Json(BulkRenewReport { updated, total }))
}

pub async fn delete_member(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Path(customer_number): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.member_repo.delete(&customer_number).await?;

    info!("Deleted member {}", customer_number);

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_all(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DeleteAllRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.confirmation != DELETE_ALL_PHRASE {
        return Err(AppError::Validation(
            "Confirmation phrase does not match".to_string(),
        ));
    }

    let deleted = state.member_repo.delete_all().await?;

    warn!("Deleted all {} members", deleted);

    Ok(Json(json!({ "deleted": deleted })))
}

fn validate_preset(weeks: i64) -> Result<(), AppError> {
    if !expiry::is_renewal_preset(weeks) {
        return Err(AppError::Validation(format!(
            "Invalid renewal duration, allowed: {:?} weeks",
            RENEWAL_PRESET_WEEKS
        )));
    }
    Ok(())
}
