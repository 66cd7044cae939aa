use crate::api::dtos::requests::ExportQuery;
use crate::api::extractors::auth::AdminSession;
use crate::domain::models::member::Member;
use crate::domain::services::export::{export_rows, EXPORT_HEADERS};
use crate::error::AppError;
use crate::infra::files::{csv, xlsx};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

const FETCH_WINDOW: i64 = 1000;

pub async fn export_members(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let members = fetch_all(&state).await?;
    let rows = export_rows(&members, &state.config.public_base_url);
    let date = Utc::now().format("%Y-%m-%d");

    info!("Exporting {} members", members.len());

    let response = match query.format.as_deref() {
        Some("xlsx") => {
            let bytes = xlsx::write(EXPORT_HEADERS, &rows)?;
            (
                [
                    (
                        header::CONTENT_TYPE,
                        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
                            .to_string(),
                    ),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"mitglieder_export_{}.xlsx\"", date),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        _ => {
            let body = csv::write(EXPORT_HEADERS, &rows);
            (
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"mitglieder_export_{}.csv\"", date),
                    ),
                ],
                body,
            )
                .into_response()
        }
    };

    Ok(response)
}

async fn fetch_all(state: &AppState) -> Result<Vec<Member>, AppError> {
    let mut members = Vec::new();
    let mut offset = 0i64;

    loop {
        let batch = state.member_repo.list_page(FETCH_WINDOW, offset).await?;
        let len = batch.len() as i64;
        members.extend(batch);
        if len < FETCH_WINDOW {
            break;
        }
        offset += FETCH_WINDOW;
    }

    Ok(members)
}
