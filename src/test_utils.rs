//! Shared helpers for the test suite. Each test gets its own in-memory
//! `SQLite` database with the full schema.

use crate::{
    config::database::create_tables,
    core::{
        auth::hash_password,
        invoice::{LineRequest, create_invoice},
        patient::{PatientInput, create_patient},
        service::{ServiceInput, create_service},
    },
    entities::{Position, ServiceCategory, invoice, patient, service, staff_profile, user},
    errors::Result,
};
use sea_orm::{Database, DatabaseConnection, Set, prelude::*};

/// Password used by every test fixture account.
pub const TEST_PASSWORD: &str = "correct horse battery";

/// Creates a fresh in-memory database with all tables.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    create_tables(&db).await?;
    Ok(db)
}

/// Inserts a staff account with [`TEST_PASSWORD`] and a profile; `approved`
/// controls both the profile flag and the account's active flag.
pub async fn create_test_staff(
    db: &DatabaseConnection,
    username: &str,
    approved: bool,
) -> Result<(user::Model, staff_profile::Model)> {
    let account = user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{username}@clinic.test")),
        password_hash: Set(hash_password(TEST_PASSWORD)),
        first_name: Set(username.to_string()),
        last_name: Set("Test".to_string()),
        is_staff: Set(true),
        is_active: Set(approved),
        is_superuser: Set(false),
        date_joined: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let account = account.insert(db).await?;

    let profile = staff_profile::ActiveModel {
        user_id: Set(account.id),
        position: Set(Position::Assistant),
        created_at: Set(chrono::Utc::now()),
        approved: Set(approved),
        is_archived: Set(false),
        ..Default::default()
    };
    let profile = profile.insert(db).await?;
    Ok((account, profile))
}

/// Inserts a superuser account with [`TEST_PASSWORD`] and no profile.
pub async fn create_test_superuser(
    db: &DatabaseConnection,
    username: &str,
) -> Result<user::Model> {
    let account = user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{username}@clinic.test")),
        password_hash: Set(hash_password(TEST_PASSWORD)),
        first_name: Set(String::new()),
        last_name: Set(String::new()),
        is_staff: Set(true),
        is_active: Set(true),
        is_superuser: Set(true),
        date_joined: Set(chrono::Utc::now()),
        ..Default::default()
    };
    account.insert(db).await.map_err(Into::into)
}

/// Creates a patient with just the required names.
pub async fn create_test_patient(
    db: &DatabaseConnection,
    first_name: &str,
    last_name: &str,
) -> Result<patient::Model> {
    create_patient(
        db,
        PatientInput {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            ..Default::default()
        },
        None,
    )
    .await
}

/// Creates an active check-up category service at the given price.
pub async fn create_test_service(
    db: &DatabaseConnection,
    name: &str,
    price: f64,
) -> Result<service::Model> {
    create_service(
        db,
        ServiceInput {
            category: ServiceCategory::Checkup,
            name: name.to_string(),
            description: String::new(),
            price: Some(price),
            active: true,
        },
    )
    .await
}

/// Creates an invoice from `(service_id, quantity)` pairs.
pub async fn create_test_invoice(
    db: &DatabaseConnection,
    patient_id: Option<i64>,
    lines: &[(i64, i32)],
) -> Result<invoice::Model> {
    let requests: Vec<LineRequest> = lines
        .iter()
        .map(|&(service_id, quantity)| LineRequest {
            service_id,
            quantity,
        })
        .collect();
    let detail = create_invoice(db, patient_id, &requests, None).await?;
    Ok(detail.invoice)
}
