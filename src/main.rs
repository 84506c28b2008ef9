//! Server binary: loads configuration, prepares the database, seeds the
//! default catalog, ensures the superuser account, and serves the router.

use clinic_pos::{
    api::{AppState, router},
    config::{
        database::{create_connection, create_tables},
        settings::load_app_configuration,
    },
    core::{service, staff},
    errors::{Error, Result},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    dotenvy::dotenv().ok();

    let settings = load_app_configuration()?;
    let db = create_connection().await?;
    create_tables(&db).await?;
    service::seed_default_catalog(&db).await?;

    match std::env::var("ADMIN_PASSWORD") {
        Ok(password) => {
            let username =
                std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
            let email = std::env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| format!("{username}@localhost"));
            staff::ensure_superuser(&db, &username, &email, &password).await?;
        }
        Err(_) => {
            tracing::warn!("ADMIN_PASSWORD not set; skipping superuser bootstrap");
        }
    }

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .map_err(Error::Io)?;
    tracing::info!(addr = %settings.bind_addr, clinic = %settings.clinic_name, "listening");

    let app = router(AppState { db, settings });
    axum::serve(listener, app).await.map_err(Error::Io)?;
    Ok(())
}
