//! HTTP handlers for the listing service

use axum::{
    extract::{rejection::JsonRejection, Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use uuid::Uuid;

use jobboard_core::submission::SUBMITTED_MESSAGE;
use jobboard_core::{normalize_listing, parse_role_params, LockedRoles};
use jobboard_types::{ListingDetail, ListingRecord, NewListing};

use crate::error::ApiError;
use crate::models::*;
use crate::state::AppState;

/// Header carrying the moderation key
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

const JOB_COLUMNS: &str = "id, title, restaurant_name, role_category, city, state, apply_email, \
     company_website, employment_type, pay_range, address, how_to_apply, description, active, \
     created_at";

/// Handler: GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "jobboard-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn active_jobs(state: &AppState, limit: Option<u32>) -> Result<Vec<DbJob>, ApiError> {
    let sql = format!(
        "SELECT {} FROM jobs WHERE active = 1 ORDER BY created_at DESC, rowid DESC LIMIT ?",
        JOB_COLUMNS
    );
    let limit = limit.map(i64::from).unwrap_or(-1);
    let rows = sqlx::query_as::<_, DbJob>(&sql)
        .bind(limit)
        .fetch_all(&state.db)
        .await?;
    Ok(rows)
}

/// Handler: GET /api/jobs?role=Line&role=Prep
///
/// Active listings, newest first. Repeated `role` parameters restrict the
/// result to those role categories.
pub async fn list_jobs(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<ListingRecord>>, ApiError> {
    let locked = LockedRoles::new(parse_role_params(query.as_deref().unwrap_or("")));

    let records: Vec<ListingRecord> = active_jobs(&state, None)
        .await?
        .iter()
        .map(DbJob::record)
        .filter(|r| locked.admits(r))
        .collect();

    tracing::debug!(
        "Listing {} active jobs for roles {:?}",
        records.len(),
        locked.to_vec()
    );
    Ok(Json(records))
}

/// Handler: GET /api/jobs/latest
pub async fn latest_jobs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ListingRecord>>, ApiError> {
    let rows = active_jobs(&state, Some(state.latest_limit)).await?;
    Ok(Json(rows.iter().map(DbJob::record).collect()))
}

async fn find_job(state: &AppState, id: &str) -> Result<Option<DbJob>, ApiError> {
    let sql = format!("SELECT {} FROM jobs WHERE id = ?", JOB_COLUMNS);
    let row = sqlx::query_as::<_, DbJob>(&sql)
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    Ok(row)
}

/// Handler: GET /api/jobs/:id
///
/// Unpublished listings are reported exactly like missing ones.
pub async fn get_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ListingDetail>, ApiError> {
    match find_job(&state, &id).await? {
        Some(job) if job.active => Ok(Json(job.into_detail())),
        _ => Err(ApiError::ListingNotFound(id)),
    }
}

/// Handler: POST /api/jobs
///
/// Stores the submission unpublished until a moderator approves it.
pub async fn submit_job(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewListing>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let Json(raw) = payload.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    let listing = normalize_listing(&raw)?;

    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

    sqlx::query(
        r#"
        INSERT INTO jobs (id, title, restaurant_name, role_category, city, state, apply_email,
                          company_website, employment_type, pay_range, address, how_to_apply,
                          description, active, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?)
        "#,
    )
    .bind(&id)
    .bind(&listing.title)
    .bind(&listing.restaurant_name)
    .bind(&listing.role_category)
    .bind(&listing.city)
    .bind(&listing.state)
    .bind(&listing.apply_email)
    .bind(&listing.company_website)
    .bind(&listing.employment_type)
    .bind(&listing.pay_range)
    .bind(&listing.address)
    .bind(&listing.how_to_apply)
    .bind(&listing.description)
    .bind(&now)
    .execute(&state.db)
    .await?;

    tracing::info!(
        "Listing submitted for approval: {} ({} at {})",
        id,
        listing.title,
        listing.restaurant_name
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            success: true,
            id,
            message: SUBMITTED_MESSAGE,
        }),
    ))
}

/// Handler: POST /api/admin/jobs/:id/approve
pub async fn approve_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ApproveResponse>, ApiError> {
    let provided = headers
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok());
    match (state.admin_key.as_deref(), provided) {
        (Some(expected), Some(given)) if expected == given => {}
        _ => {
            tracing::warn!("Rejected approval attempt for {}", id);
            return Err(ApiError::Forbidden);
        }
    }

    let result = sqlx::query("UPDATE jobs SET active = 1 WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::ListingNotFound(id));
    }

    tracing::info!("Listing approved: {}", id);
    Ok(Json(ApproveResponse {
        success: true,
        id,
        active: true,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = health().await;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.service, "jobboard-api");
    }
}
