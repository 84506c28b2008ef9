//! Staff management endpoints for the back-office.

use crate::{
    api::{AppState, extract::AdminSession},
    core::staff::{self, StaffRecord},
    errors::Result,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

/// `GET /admin/staff` - approved staff.
pub async fn admin_list(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<StaffRecord>>> {
    staff::list_active_staff(&state.db).await.map(Json)
}

/// `GET /admin/staff/pending` - registrations awaiting review.
pub async fn admin_pending(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<StaffRecord>>> {
    staff::pending_staff(&state.db).await.map(Json)
}

/// `POST /admin/staff/:id/approve`
pub async fn admin_approve(
    State(state): State<AppState>,
    admin: AdminSession,
    Path(id): Path<i64>,
) -> Result<Json<StaffRecord>> {
    let record = staff::approve_staff(&state.db, id).await?;
    tracing::info!(
        admin = %admin.user.username,
        staff = %record.user.username,
        "staff approved"
    );
    Ok(Json(record))
}

/// `POST /admin/staff/:id/reject` - deletes the pending registration.
pub async fn admin_reject(
    State(state): State<AppState>,
    admin: AdminSession,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    staff::reject_staff(&state.db, id).await?;
    tracing::info!(admin = %admin.user.username, profile_id = id, "staff rejected");
    Ok(Json(json!({ "message": "registration rejected" })))
}

/// `POST /admin/staff/:id/archive`
pub async fn admin_archive(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i64>,
) -> Result<Json<StaffRecord>> {
    staff::archive_staff(&state.db, id).await.map(Json)
}

/// `POST /admin/staff/:id/restore`
pub async fn admin_restore(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i64>,
) -> Result<Json<StaffRecord>> {
    staff::restore_staff(&state.db, id).await.map(Json)
}

/// `DELETE /admin/staff/:id` - permanent, archived profiles only.
pub async fn admin_delete(
    State(state): State<AppState>,
    admin: AdminSession,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    staff::delete_staff_permanent(&state.db, id).await?;
    tracing::info!(admin = %admin.user.username, profile_id = id, "staff permanently deleted");
    Ok(StatusCode::NO_CONTENT)
}
