use crate::api::dtos::requests::ImportRequest;
use crate::api::dtos::responses::ImportReport;
use crate::api::extractors::auth::AdminSession;
use crate::domain::models::member::Member;
use crate::domain::services::{expiry, mapping};
use crate::error::AppError;
use crate::infra::files::{csv, xlsx, ParsedTable};
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Parses an uploaded roster file and suggests a column mapping. Nothing is
/// written yet; the admin confirms or adjusts the mapping before committing.
pub async fn preview(
    _session: AdminSession,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {}", e)))?
    {
        if let Some(filename) = field.file_name().map(str::to_string) {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {}", e)))?;
            upload = Some((filename, data.to_vec()));
            break;
        }
    }

    let (filename, data) =
        upload.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    let table = parse_upload(&filename, &data)?;
    let suggested = mapping::suggest_mapping(&table.headers);
    let missing_required = suggested.missing_required();
    let mapping_valid = missing_required.is_empty();

    info!(
        "Import preview of {}: {} columns, {} rows",
        filename,
        table.headers.len(),
        table.rows.len()
    );

    Ok(Json(json!({
        "headers": table.headers,
        "rows": table.rows,
        "suggested_mapping": suggested,
        "mapping_valid": mapping_valid,
        "missing_required": missing_required,
    })))
}

/// Upserts the parsed rows by customer number. Existing members keep their
/// token and change tracking; everybody's validity window restarts. Stops at
/// the first failing row.
pub async fn commit(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ImportRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !payload.mapping.is_valid() {
        return Err(AppError::Validation(format!(
            "Mapping is missing required fields: {}",
            payload.mapping.missing_required().join(", ")
        )));
    }

    let now = Utc::now();
    let expiry = expiry::default_expiry(now);
    let mut inserted = 0usize;
    let mut updated = 0usize;

    for (index, row) in payload.rows.iter().enumerate() {
        let import = mapping::apply_mapping(&payload.mapping, &payload.headers, row);
        let customer_number = import.customer_number.trim().to_string();
        if customer_number.is_empty() {
            return Err(AppError::Validation(format!(
                "Row {} has no customer number",
                index + 1
            )));
        }

        match state
            .member_repo
            .find_by_customer_number(&customer_number)
            .await?
        {
            Some(_) => {
                state
                    .member_repo
                    .update_from_import(&customer_number, &import, expiry)
                    .await?;
                updated += 1;
            }
            None => {
                state
                    .member_repo
                    .insert(&Member::from_import(import, now))
                    .await?;
                inserted += 1;
            }
        }
    }

    info!(
        "Import committed: {} rows, {} inserted, {} updated",
        payload.rows.len(),
        inserted,
        updated
    );

    Ok(Json(ImportReport {
        total: payload.rows.len(),
        inserted,
        updated,
    }))
}

fn parse_upload(filename: &str, data: &[u8]) -> Result<ParsedTable, AppError> {
    let lower = filename.to_lowercase();
    if lower.ends_with(".csv") {
        csv::parse(&String::from_utf8_lossy(data))
    } else if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
        xlsx::parse(data)
    } else {
        Err(AppError::Validation(
            "Unsupported file type, expected .csv, .xls or .xlsx".to_string(),
        ))
    }
}
