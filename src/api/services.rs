//! Service catalog endpoints.
//!
//! The JSON API exposes only the sellable catalog; the back-office manages
//! the full catalog including inactive and archived entries.

use crate::{
    api::{
        AppState,
        extract::{AdminSession, ApiUser},
    },
    core::service::{self, ServiceInput},
    entities::{ServiceCategory, service::Model as ServiceModel},
    errors::Result,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
pub(crate) struct ServiceBody {
    category: ServiceCategory,
    name: String,
    #[serde(default)]
    description: String,
    price: Option<f64>,
    #[serde(default = "default_active")]
    active: bool,
}

const fn default_active() -> bool {
    true
}

impl From<ServiceBody> for ServiceInput {
    fn from(body: ServiceBody) -> Self {
        Self {
            category: body.category,
            name: body.name,
            description: body.description,
            price: body.price,
            active: body.active,
        }
    }
}

/// `GET /api/services` - sellable catalog.
pub async fn api_list(
    State(state): State<AppState>,
    _auth: ApiUser,
) -> Result<Json<Vec<ServiceModel>>> {
    service::list_sellable_services(&state.db).await.map(Json)
}

/// `GET /admin/services` - full non-archived catalog.
pub async fn admin_list(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<ServiceModel>>> {
    service::list_services(&state.db).await.map(Json)
}

/// `POST /admin/services`
pub async fn admin_create(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(body): Json<ServiceBody>,
) -> Result<(StatusCode, Json<ServiceModel>)> {
    let created = service::create_service(&state.db, body.into()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /admin/services/:id`
pub async fn admin_get(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i64>,
) -> Result<Json<ServiceModel>> {
    service::get_service(&state.db, id).await.map(Json)
}

/// `PUT /admin/services/:id`
pub async fn admin_update(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i64>,
    Json(body): Json<ServiceBody>,
) -> Result<Json<ServiceModel>> {
    service::update_service(&state.db, id, body.into()).await.map(Json)
}

/// `POST /admin/services/:id/archive` - cascades to invoices billing it.
pub async fn admin_archive(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    service::archive_service(&state.db, id).await?;
    Ok(Json(json!({ "message": "service archived" })))
}

/// `POST /admin/services/:id/restore`
pub async fn admin_restore(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i64>,
) -> Result<Json<ServiceModel>> {
    service::restore_service(&state.db, id).await.map(Json)
}

/// `DELETE /admin/services/:id` - permanent, archived rows only.
pub async fn admin_delete(
    State(state): State<AppState>,
    admin: AdminSession,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    service::delete_service_permanent(&state.db, id).await?;
    tracing::info!(admin = %admin.user.username, service_id = id, "service permanently deleted");
    Ok(StatusCode::NO_CONTENT)
}
