//! HTTP surface.
//!
//! Three authenticated surfaces share one router: the JSON API under `/api`
//! (bearer API tokens), the back-office under `/admin` (superuser sessions
//! with the explicit front-desk flag), and the POS under `/pos` (sessions for
//! approved staff). Handlers are thin shells over [`crate::core`].

use crate::config::settings::AppSettings;
use axum::{
    Json, Router,
    routing::{delete, get, post},
};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Request guards for the three auth surfaces
pub mod extract;

/// Login, registration, and logout for all three surfaces
pub mod auth;
/// Invoice endpoints, including the receipt PDF
pub mod invoices;
/// Patient endpoints
pub mod patients;
/// POS endpoints: catalog and checkout
pub mod pos;
/// Report downloads and analytics
pub mod reports;
/// Service catalog endpoints
pub mod services;
/// Staff approval and lifecycle endpoints
pub mod staff;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// Database handle
    pub db: DatabaseConnection,
    /// Clinic identity and bind address
    pub settings: AppSettings,
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Builds the full application router.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // JSON API
        .route("/api/auth/login", post(auth::api_login))
        .route("/api/auth/register", post(auth::api_register))
        .route("/api/auth/logout", post(auth::api_logout))
        .route(
            "/api/patients",
            get(patients::api_list).post(patients::api_create),
        )
        .route(
            "/api/patients/:id",
            get(patients::api_get).put(patients::api_update),
        )
        .route("/api/patients/:id/archive", post(patients::api_archive))
        .route("/api/services", get(services::api_list))
        .route(
            "/api/invoices",
            get(invoices::api_list).post(invoices::api_create),
        )
        .route("/api/invoices/:id", get(invoices::api_get))
        .route("/api/invoices/:id/receipt_pdf", get(invoices::api_receipt_pdf))
        // Back-office
        .route("/admin/login", post(auth::admin_login))
        .route("/admin/logout", post(auth::admin_logout))
        .route(
            "/admin/patients",
            get(patients::admin_list).post(patients::admin_create),
        )
        .route(
            "/admin/patients/:id",
            get(patients::admin_get)
                .put(patients::admin_update)
                .delete(patients::admin_delete),
        )
        .route("/admin/patients/:id/archive", post(patients::admin_archive))
        .route("/admin/patients/:id/restore", post(patients::admin_restore))
        .route(
            "/admin/services",
            get(services::admin_list).post(services::admin_create),
        )
        .route(
            "/admin/services/:id",
            get(services::admin_get)
                .put(services::admin_update)
                .delete(services::admin_delete),
        )
        .route("/admin/services/:id/archive", post(services::admin_archive))
        .route("/admin/services/:id/restore", post(services::admin_restore))
        .route(
            "/admin/invoices",
            get(invoices::admin_list).post(invoices::admin_create),
        )
        .route(
            "/admin/invoices/:id",
            get(invoices::admin_get)
                .put(invoices::admin_set_paid)
                .delete(invoices::admin_delete),
        )
        .route("/admin/invoices/:id/archive", post(invoices::admin_archive))
        .route("/admin/invoices/:id/restore", post(invoices::admin_restore))
        .route("/admin/archive", get(reports::admin_archive_overview))
        .route("/admin/staff", get(staff::admin_list))
        .route("/admin/staff/pending", get(staff::admin_pending))
        .route("/admin/staff/:id", delete(staff::admin_delete))
        .route("/admin/staff/:id/approve", post(staff::admin_approve))
        .route("/admin/staff/:id/reject", post(staff::admin_reject))
        .route("/admin/staff/:id/archive", post(staff::admin_archive))
        .route("/admin/staff/:id/restore", post(staff::admin_restore))
        .route(
            "/admin/reports/sales_summary.csv",
            get(reports::admin_sales_csv),
        )
        .route(
            "/admin/reports/sales_summary.pdf",
            get(reports::admin_sales_pdf),
        )
        .route(
            "/admin/reports/sales_summary.xlsx",
            get(reports::admin_sales_xlsx),
        )
        .route("/admin/reports/analytics", get(reports::admin_analytics))
        // POS
        .route("/pos/login", post(auth::pos_login))
        .route("/pos/logout", post(auth::pos_logout))
        .route("/pos/services", get(pos::list_services))
        .route("/pos/checkout", post(pos::checkout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
