//! Patient business logic.
//!
//! Creation, lookup, update, and the archive lifecycle. Archiving a patient
//! cascades to all of that patient's invoices per the declared policy;
//! permanent deletion nulls the invoice reference instead of deleting invoice
//! history.

use crate::{
    core::lifecycle::{self, EntityKind},
    entities::{Invoice, Patient, invoice, patient},
    errors::{Error, Result},
};
use sea_orm::{
    Condition, QueryOrder, Set, TransactionTrait, Unchanged, prelude::*, sea_query::Expr,
};

/// Fields accepted when creating or updating a patient.
#[derive(Debug, Clone, Default)]
pub struct PatientInput {
    /// Given name, required
    pub first_name: String,
    /// Family name, required
    pub last_name: String,
    /// Phone number, may be blank
    pub contact_number: String,
    /// Email, may be blank
    pub email: String,
    /// Postal address, may be blank
    pub address: String,
}

fn validate(input: &PatientInput) -> Result<()> {
    if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
        return Err(Error::validation("first_name and last_name are required"));
    }
    Ok(())
}

/// Creates a patient record.
pub async fn create_patient(
    db: &DatabaseConnection,
    input: PatientInput,
    created_by: Option<i64>,
) -> Result<patient::Model> {
    validate(&input)?;

    let patient = patient::ActiveModel {
        first_name: Set(input.first_name.trim().to_string()),
        last_name: Set(input.last_name.trim().to_string()),
        contact_number: Set(input.contact_number),
        email: Set(input.email),
        address: Set(input.address),
        created_by: Set(created_by),
        created_at: Set(chrono::Utc::now()),
        is_archived: Set(false),
        ..Default::default()
    };
    patient.insert(db).await.map_err(Into::into)
}

/// Lists non-archived patients, newest first, optionally filtered by a search
/// term over names and contact number.
pub async fn list_patients(
    db: &DatabaseConnection,
    search: Option<&str>,
) -> Result<Vec<patient::Model>> {
    let mut query = Patient::find().filter(patient::Column::IsArchived.eq(false));

    if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = format!("%{term}%");
        query = query.filter(
            Condition::any()
                .add(patient::Column::FirstName.like(&pattern))
                .add(patient::Column::LastName.like(&pattern))
                .add(patient::Column::ContactNumber.like(&pattern)),
        );
    }

    query
        .order_by_desc(patient::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists archived patients for the archive screen.
pub async fn list_archived_patients(db: &DatabaseConnection) -> Result<Vec<patient::Model>> {
    Patient::find()
        .filter(patient::Column::IsArchived.eq(true))
        .order_by_desc(patient::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Fetches one patient or errors with not-found.
pub async fn get_patient(db: &DatabaseConnection, id: i64) -> Result<patient::Model> {
    Patient::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "patient", id })
}

/// Updates a patient's contact fields.
pub async fn update_patient(
    db: &DatabaseConnection,
    id: i64,
    input: PatientInput,
) -> Result<patient::Model> {
    validate(&input)?;
    let existing = get_patient(db, id).await?;

    let patient = patient::ActiveModel {
        id: Unchanged(existing.id),
        first_name: Set(input.first_name.trim().to_string()),
        last_name: Set(input.last_name.trim().to_string()),
        contact_number: Set(input.contact_number),
        email: Set(input.email),
        address: Set(input.address),
        ..Default::default()
    };
    patient.update(db).await.map_err(Into::into)
}

/// Archives a patient and, per the cascade policy, all of their invoices.
pub async fn archive_patient(db: &DatabaseConnection, id: i64) -> Result<()> {
    let existing = get_patient(db, id).await?;
    let txn = db.begin().await?;

    let mut patient: patient::ActiveModel = existing.into();
    patient.is_archived = Set(true);
    patient.update(&txn).await?;

    if lifecycle::cascades_to_invoices(EntityKind::Patient) {
        Invoice::update_many()
            .col_expr(invoice::Column::IsArchived, Expr::value(true))
            .filter(invoice::Column::PatientId.eq(id))
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;
    Ok(())
}

/// Restores an archived patient. Does not restore cascaded invoices.
pub async fn restore_patient(db: &DatabaseConnection, id: i64) -> Result<patient::Model> {
    let existing = Patient::find_by_id(id)
        .filter(patient::Column::IsArchived.eq(true))
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "patient", id })?;

    let mut patient: patient::ActiveModel = existing.into();
    patient.is_archived = Set(false);
    patient.update(db).await.map_err(Into::into)
}

/// Permanently deletes an archived patient.
///
/// Invoices that referenced the patient keep their history with a nulled
/// patient reference (SET NULL semantics). Non-archived patients are scoped
/// out and report not-found.
pub async fn delete_patient_permanent(db: &DatabaseConnection, id: i64) -> Result<()> {
    let existing = Patient::find_by_id(id)
        .filter(patient::Column::IsArchived.eq(true))
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "patient", id })?;

    let txn = db.begin().await?;
    Invoice::update_many()
        .col_expr(invoice::Column::PatientId, Expr::value(Option::<i64>::None))
        .filter(invoice::Column::PatientId.eq(existing.id))
        .exec(&txn)
        .await?;
    existing.delete(&txn).await?;
    txn.commit().await?;
    Ok(())
}
