/// Database connection and schema management
pub mod database;

/// Application settings loading from environment and clinic.toml
pub mod settings;
