//! Report downloads, analytics, and the archive overview.

use crate::{
    api::{AppState, extract::AdminSession},
    core::{export, invoice, patient, report, service, staff},
    errors::Result,
};
use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
pub(crate) struct RangeQuery {
    start: Option<String>,
    end: Option<String>,
}

impl RangeQuery {
    fn range(&self) -> report::DateRange {
        report::DateRange::parse(self.start.as_deref(), self.end.as_deref())
    }
}

fn download(content_type: &'static str, filename: &str, bytes: Vec<u8>) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
}

/// `GET /admin/reports/sales_summary.csv`
pub async fn admin_sales_csv(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse> {
    let summary = report::sales_summary(&state.db, query.range()).await?;
    let bytes = export::render_sales_csv(&summary)?;
    Ok(download("text/csv", "sales_summary.csv", bytes))
}

/// `GET /admin/reports/sales_summary.pdf`
pub async fn admin_sales_pdf(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse> {
    let summary = report::sales_summary(&state.db, query.range()).await?;
    let bytes = export::render_sales_pdf(&summary, &state.settings)?;
    Ok(download("application/pdf", "sales_summary.pdf", bytes))
}

/// `GET /admin/reports/sales_summary.xlsx`
pub async fn admin_sales_xlsx(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse> {
    let summary = report::sales_summary(&state.db, query.range()).await?;
    let bytes = export::render_sales_xlsx(&summary)?;
    Ok(download(
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "sales_summary.xlsx",
        bytes,
    ))
}

/// `GET /admin/reports/analytics` - dashboard buckets plus the per-staff
/// breakdown.
pub async fn admin_analytics(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Value>> {
    let stats = report::dashboard_stats(&state.db).await?;
    let breakdown = report::staff_breakdown(&state.db).await?;
    Ok(Json(json!({ "dashboard": stats, "staff": breakdown })))
}

/// `GET /admin/archive` - everything currently archived, grouped by kind.
pub async fn admin_archive_overview(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Value>> {
    let patients = patient::list_archived_patients(&state.db).await?;
    let services = service::list_archived_services(&state.db).await?;
    let invoices = invoice::list_archived_invoices(&state.db).await?;
    let staff = staff::list_archived_staff(&state.db).await?;
    Ok(Json(json!({
        "patients": patients,
        "services": services,
        "invoices": invoices,
        "staff": staff,
    })))
}
