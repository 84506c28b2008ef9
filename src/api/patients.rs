//! Patient endpoints for the JSON API and the back-office.

use crate::{
    api::{
        AppState,
        extract::{AdminSession, ApiUser},
    },
    core::patient::{self, PatientInput},
    entities::patient::Model as PatientModel,
    errors::Result,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
pub(crate) struct PatientBody {
    first_name: String,
    last_name: String,
    #[serde(default)]
    contact_number: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    address: String,
}

impl From<PatientBody> for PatientInput {
    fn from(body: PatientBody) -> Self {
        Self {
            first_name: body.first_name,
            last_name: body.last_name,
            contact_number: body.contact_number,
            email: body.email,
            address: body.address,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchQuery {
    search: Option<String>,
}

/// `GET /api/patients` - list with optional `?search=`.
pub async fn api_list(
    State(state): State<AppState>,
    _auth: ApiUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<PatientModel>>> {
    patient::list_patients(&state.db, query.search.as_deref())
        .await
        .map(Json)
}

/// `POST /api/patients` - create, recording the creating account.
pub async fn api_create(
    State(state): State<AppState>,
    ApiUser(account): ApiUser,
    Json(body): Json<PatientBody>,
) -> Result<(StatusCode, Json<PatientModel>)> {
    let created = patient::create_patient(&state.db, body.into(), Some(account.id)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/patients/:id`
pub async fn api_get(
    State(state): State<AppState>,
    _auth: ApiUser,
    Path(id): Path<i64>,
) -> Result<Json<PatientModel>> {
    patient::get_patient(&state.db, id).await.map(Json)
}

/// `PUT /api/patients/:id`
pub async fn api_update(
    State(state): State<AppState>,
    _auth: ApiUser,
    Path(id): Path<i64>,
    Json(body): Json<PatientBody>,
) -> Result<Json<PatientModel>> {
    patient::update_patient(&state.db, id, body.into()).await.map(Json)
}

/// `POST /api/patients/:id/archive`
pub async fn api_archive(
    State(state): State<AppState>,
    _auth: ApiUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    patient::archive_patient(&state.db, id).await?;
    Ok(Json(json!({ "message": "patient archived" })))
}

/// `GET /admin/patients`
pub async fn admin_list(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<PatientModel>>> {
    patient::list_patients(&state.db, query.search.as_deref())
        .await
        .map(Json)
}

/// `POST /admin/patients`
pub async fn admin_create(
    State(state): State<AppState>,
    admin: AdminSession,
    Json(body): Json<PatientBody>,
) -> Result<(StatusCode, Json<PatientModel>)> {
    let created = patient::create_patient(&state.db, body.into(), Some(admin.user.id)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /admin/patients/:id`
pub async fn admin_get(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i64>,
) -> Result<Json<PatientModel>> {
    patient::get_patient(&state.db, id).await.map(Json)
}

/// `PUT /admin/patients/:id`
pub async fn admin_update(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i64>,
    Json(body): Json<PatientBody>,
) -> Result<Json<PatientModel>> {
    patient::update_patient(&state.db, id, body.into()).await.map(Json)
}

/// `POST /admin/patients/:id/archive`
pub async fn admin_archive(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    patient::archive_patient(&state.db, id).await?;
    Ok(Json(json!({ "message": "patient archived" })))
}

/// `POST /admin/patients/:id/restore`
pub async fn admin_restore(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i64>,
) -> Result<Json<PatientModel>> {
    patient::restore_patient(&state.db, id).await.map(Json)
}

/// `DELETE /admin/patients/:id` - permanent, archived rows only.
pub async fn admin_delete(
    State(state): State<AppState>,
    admin: AdminSession,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    patient::delete_patient_permanent(&state.db, id).await?;
    tracing::info!(admin = %admin.user.username, patient_id = id, "patient permanently deleted");
    Ok(StatusCode::NO_CONTENT)
}
