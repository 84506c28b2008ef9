//! Invoice endpoints, including the receipt PDF download.

use crate::{
    api::{
        AppState,
        extract::{AdminSession, ApiUser},
    },
    core::{
        export,
        invoice::{self, InvoiceDetail, LineRequest},
    },
    entities::invoice::Model as InvoiceModel,
    errors::Result,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct LineBody {
    service_id: i64,
    #[serde(default = "default_quantity")]
    quantity: i32,
}

const fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
pub(crate) struct InvoiceBody {
    patient_id: Option<i64>,
    items: Vec<LineBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InvoiceQuery {
    patient: Option<i64>,
}

fn line_requests(items: &[LineBody]) -> Vec<LineRequest> {
    items
        .iter()
        .map(|l| LineRequest {
            service_id: l.service_id,
            quantity: l.quantity,
        })
        .collect()
}

/// `GET /api/invoices` - non-archived invoices, optionally `?patient=`.
pub async fn api_list(
    State(state): State<AppState>,
    _auth: ApiUser,
    Query(query): Query<InvoiceQuery>,
) -> Result<Json<Vec<InvoiceDetail>>> {
    invoice::list_invoices(&state.db, query.patient).await.map(Json)
}

/// `POST /api/invoices` - creates an invoice with snapshotted lines.
pub async fn api_create(
    State(state): State<AppState>,
    ApiUser(account): ApiUser,
    Json(body): Json<InvoiceBody>,
) -> Result<(StatusCode, Json<InvoiceDetail>)> {
    let detail = invoice::create_invoice(
        &state.db,
        body.patient_id,
        &line_requests(&body.items),
        Some(account.id),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// `GET /api/invoices/:id`
pub async fn api_get(
    State(state): State<AppState>,
    _auth: ApiUser,
    Path(id): Path<i64>,
) -> Result<Json<InvoiceDetail>> {
    invoice::get_invoice(&state.db, id).await.map(Json)
}

/// `GET /api/invoices/:id/receipt_pdf` - receipt download.
pub async fn api_receipt_pdf(
    State(state): State<AppState>,
    _auth: ApiUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let detail = invoice::get_invoice(&state.db, id).await?;
    let bytes = export::render_receipt_pdf(&detail, &state.settings)?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"receipt_{id}.pdf\""),
            ),
        ],
        bytes,
    ))
}

/// `POST /admin/invoices` - creates an invoice with embedded items.
pub async fn admin_create(
    State(state): State<AppState>,
    admin: AdminSession,
    Json(body): Json<InvoiceBody>,
) -> Result<(StatusCode, Json<InvoiceDetail>)> {
    let detail = invoice::create_invoice(
        &state.db,
        body.patient_id,
        &line_requests(&body.items),
        Some(admin.user.id),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// `GET /admin/invoices`
pub async fn admin_list(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(query): Query<InvoiceQuery>,
) -> Result<Json<Vec<InvoiceDetail>>> {
    invoice::list_invoices(&state.db, query.patient).await.map(Json)
}

/// `GET /admin/invoices/:id`
pub async fn admin_get(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i64>,
) -> Result<Json<InvoiceDetail>> {
    invoice::get_invoice(&state.db, id).await.map(Json)
}

#[derive(Debug, Deserialize)]
pub(crate) struct PaidBody {
    #[serde(default = "default_paid")]
    is_paid: bool,
}

const fn default_paid() -> bool {
    true
}

/// `PUT /admin/invoices/:id` - toggles the payment state.
pub async fn admin_set_paid(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i64>,
    Json(body): Json<PaidBody>,
) -> Result<Json<InvoiceModel>> {
    invoice::set_paid(&state.db, id, body.is_paid).await.map(Json)
}

/// `POST /admin/invoices/:id/archive`
pub async fn admin_archive(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i64>,
) -> Result<Json<InvoiceModel>> {
    invoice::archive_invoice(&state.db, id).await.map(Json)
}

/// `POST /admin/invoices/:id/restore`
pub async fn admin_restore(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i64>,
) -> Result<Json<InvoiceModel>> {
    invoice::restore_invoice(&state.db, id).await.map(Json)
}

/// `DELETE /admin/invoices/:id` - permanent, archived rows only.
pub async fn admin_delete(
    State(state): State<AppState>,
    admin: AdminSession,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    invoice::delete_invoice_permanent(&state.db, id).await?;
    tracing::info!(admin = %admin.user.username, invoice_id = id, "invoice permanently deleted");
    Ok(StatusCode::NO_CONTENT)
}
