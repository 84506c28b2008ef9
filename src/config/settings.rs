//! Application settings.
//!
//! Runtime knobs come from the environment (loaded from `.env` by `dotenvy`
//! in `main`); clinic branding used in PDF headers comes from an optional
//! `clinic.toml` next to the binary.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Settings resolved at startup and shared with the HTTP layer.
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Clinic name printed on report and receipt headers
    pub clinic_name: String,
    /// Clinic address printed under the name
    pub clinic_address: String,
}

/// Shape of the optional `clinic.toml` file.
#[derive(Debug, Deserialize, Default)]
struct ClinicFile {
    #[serde(default)]
    clinic_name: Option<String>,
    #[serde(default)]
    clinic_address: Option<String>,
}

/// Loads settings from the environment plus the optional `clinic.toml`.
///
/// Missing file or fields fall back to sensible defaults; a file that exists
/// but fails to parse is a hard error.
pub fn load_app_configuration() -> Result<AppSettings> {
    let file = load_clinic_file("clinic.toml")?;

    Ok(AppSettings {
        bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
        clinic_name: file
            .clinic_name
            .or_else(|| std::env::var("CLINIC_NAME").ok())
            .unwrap_or_else(|| "Dental Clinic".to_string()),
        clinic_address: file
            .clinic_address
            .or_else(|| std::env::var("CLINIC_ADDRESS").ok())
            .unwrap_or_default(),
    })
}

fn load_clinic_file(path: impl AsRef<Path>) -> Result<ClinicFile> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(ClinicFile::default());
    }
    let raw = std::fs::read_to_string(path)?;
    toml::from_str(&raw).map_err(|e| Error::Config {
        message: format!("failed to parse {}: {e}", path.display()),
    })
}
