//! POS endpoints: the sellable catalog and checkout.
//!
//! Checkout accepts the front-desk form as urlencoded pairs: an optional
//! `patient_id`, optional inline `first_name`/`last_name` for a new patient,
//! and one `service_<id>` field per catalog line with the quantity as value.

use crate::{
    api::{AppState, extract::PosSession},
    core::{
        invoice::{self, InvoiceDetail, LineRequest},
        patient::{self, PatientInput},
        service,
    },
    entities::service::Model as ServiceModel,
    errors::{Error, Result},
};
use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
};
use std::collections::HashMap;

/// `GET /pos/services` - the sellable catalog.
pub async fn list_services(
    State(state): State<AppState>,
    _pos: PosSession,
) -> Result<Json<Vec<ServiceModel>>> {
    service::list_sellable_services(&state.db).await.map(Json)
}

fn parse_lines(form: &HashMap<String, String>) -> Result<Vec<LineRequest>> {
    let mut lines = Vec::new();
    for (key, value) in form {
        let Some(raw_id) = key.strip_prefix("service_") else {
            continue;
        };
        let service_id = raw_id
            .parse::<i64>()
            .map_err(|_| Error::validation(format!("bad service field `{key}`")))?;
        let quantity = value.trim().parse::<i32>().unwrap_or(0);
        if quantity > 0 {
            lines.push(LineRequest { service_id, quantity });
        }
    }
    // Form iteration order is arbitrary; bill in a stable order
    lines.sort_by_key(|l| l.service_id);
    Ok(lines)
}

async fn resolve_patient(
    state: &AppState,
    form: &HashMap<String, String>,
    cashier_id: i64,
) -> Result<Option<i64>> {
    if let Some(raw) = form.get("patient_id").map(String::as_str).filter(|s| !s.trim().is_empty()) {
        let id = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| Error::validation("bad patient_id"))?;
        return Ok(Some(id));
    }

    let first = form.get("first_name").map(String::as_str).unwrap_or("").trim();
    let last = form.get("last_name").map(String::as_str).unwrap_or("").trim();
    if first.is_empty() && last.is_empty() {
        return Ok(None);
    }
    let created = patient::create_patient(
        &state.db,
        PatientInput {
            first_name: if first.is_empty() { "Unknown" } else { first }.to_string(),
            last_name: if last.is_empty() { "Patient" } else { last }.to_string(),
            contact_number: form.get("contact_number").cloned().unwrap_or_default(),
            email: String::new(),
            address: String::new(),
        },
        Some(cashier_id),
    )
    .await?;
    Ok(Some(created.id))
}

/// `POST /pos/checkout` - creates an invoice from the front-desk form.
pub async fn checkout(
    State(state): State<AppState>,
    pos: PosSession,
    Form(form): Form<HashMap<String, String>>,
) -> Result<(StatusCode, Json<InvoiceDetail>)> {
    let lines = parse_lines(&form)?;
    if lines.is_empty() {
        return Err(Error::validation("no services selected"));
    }
    let patient_id = resolve_patient(&state, &form, pos.user.id).await?;
    let detail =
        invoice::create_invoice(&state.db, patient_id, &lines, Some(pos.user.id)).await?;
    tracing::info!(
        cashier = %pos.user.username,
        invoice_id = detail.invoice.id,
        total = detail.total_amount,
        "pos checkout"
    );
    Ok((StatusCode::CREATED, Json(detail)))
}
