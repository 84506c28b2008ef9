//! Invoice business logic.
//!
//! Invoice creation snapshots the service name and price into each line item
//! inside a single transaction, so later catalog edits never change a billed
//! total. A request naming a missing or unsellable service aborts the whole
//! transaction and persists nothing.

use crate::{
    entities::{Invoice, InvoiceItem, Patient, Service, invoice, invoice_item, patient, service},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Serialize;

/// One requested line on a new invoice.
#[derive(Debug, Clone, Copy)]
pub struct LineRequest {
    /// Catalog service to bill
    pub service_id: i64,
    /// Requested quantity; anything below one is billed as one
    pub quantity: i32,
}

/// An invoice with its line items and computed total, as returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceDetail {
    /// The invoice row
    #[serde(flatten)]
    pub invoice: invoice::Model,
    /// Snapshotted line items
    pub items: Vec<invoice_item::Model>,
    /// Patient name for display, if the invoice has a patient
    pub patient_name: Option<String>,
    /// Sum of line totals, computed fresh from the snapshots
    pub total_amount: f64,
}

fn total_of(items: &[invoice_item::Model]) -> f64 {
    items.iter().map(invoice_item::Model::total_price).sum()
}

/// Creates an invoice with snapshotted line items in one transaction.
///
/// `patient_id` of `None` records a walk-in sale. Every requested service must
/// exist, be active, and not be archived; otherwise the transaction rolls
/// back and nothing is persisted.
pub async fn create_invoice(
    db: &DatabaseConnection,
    patient_id: Option<i64>,
    lines: &[LineRequest],
    created_by: Option<i64>,
) -> Result<InvoiceDetail> {
    if lines.is_empty() {
        return Err(Error::validation("an invoice needs at least one line item"));
    }
    if let Some(pid) = patient_id {
        Patient::find_by_id(pid)
            .filter(patient::Column::IsArchived.eq(false))
            .one(db)
            .await?
            .ok_or(Error::NotFound { entity: "patient", id: pid })?;
    }

    let txn = db.begin().await?;

    let header = invoice::ActiveModel {
        patient_id: Set(patient_id),
        date_created: Set(chrono::Utc::now()),
        is_paid: Set(false),
        created_by: Set(created_by),
        is_archived: Set(false),
        ..Default::default()
    };
    let header = header.insert(&txn).await?;

    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        let Some(found) = Service::find_by_id(line.service_id)
            .filter(service::Column::Active.eq(true))
            .filter(service::Column::IsArchived.eq(false))
            .one(&txn)
            .await?
        else {
            txn.rollback().await?;
            return Err(Error::NotFound {
                entity: "service",
                id: line.service_id,
            });
        };

        let item = invoice_item::ActiveModel {
            invoice_id: Set(header.id),
            service_id: Set(Some(found.id)),
            service_name_at_time: Set(found.name.clone()),
            price_at_time: Set(found.price),
            quantity: Set(line.quantity.max(1)),
            ..Default::default()
        };
        items.push(item.insert(&txn).await?);
    }

    txn.commit().await?;

    let total_amount = total_of(&items);
    let patient_name = patient_name_of(db, &header).await?;
    Ok(InvoiceDetail {
        invoice: header,
        items,
        patient_name,
        total_amount,
    })
}

async fn patient_name_of(
    db: &DatabaseConnection,
    header: &invoice::Model,
) -> Result<Option<String>> {
    let Some(pid) = header.patient_id else {
        return Ok(None);
    };
    Ok(Patient::find_by_id(pid)
        .one(db)
        .await?
        .map(|p| p.full_name()))
}

async fn load_detail(db: &DatabaseConnection, header: invoice::Model) -> Result<InvoiceDetail> {
    let items = InvoiceItem::find()
        .filter(invoice_item::Column::InvoiceId.eq(header.id))
        .order_by_asc(invoice_item::Column::Id)
        .all(db)
        .await?;
    let total_amount = total_of(&items);
    let patient_name = patient_name_of(db, &header).await?;
    Ok(InvoiceDetail {
        invoice: header,
        items,
        patient_name,
        total_amount,
    })
}

/// Fetches one invoice with items and total, or errors with not-found.
pub async fn get_invoice(db: &DatabaseConnection, id: i64) -> Result<InvoiceDetail> {
    let header = Invoice::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "invoice", id })?;
    load_detail(db, header).await
}

/// Lists non-archived invoices, newest first, optionally for one patient.
pub async fn list_invoices(
    db: &DatabaseConnection,
    patient_id: Option<i64>,
) -> Result<Vec<InvoiceDetail>> {
    let mut query = Invoice::find().filter(invoice::Column::IsArchived.eq(false));
    if let Some(pid) = patient_id {
        query = query.filter(invoice::Column::PatientId.eq(pid));
    }
    let headers = query
        .order_by_desc(invoice::Column::DateCreated)
        .all(db)
        .await?;

    let mut details = Vec::with_capacity(headers.len());
    for header in headers {
        details.push(load_detail(db, header).await?);
    }
    Ok(details)
}

/// Lists archived invoices for the archive screen.
pub async fn list_archived_invoices(db: &DatabaseConnection) -> Result<Vec<InvoiceDetail>> {
    let headers = Invoice::find()
        .filter(invoice::Column::IsArchived.eq(true))
        .order_by_desc(invoice::Column::DateCreated)
        .all(db)
        .await?;
    let mut details = Vec::with_capacity(headers.len());
    for header in headers {
        details.push(load_detail(db, header).await?);
    }
    Ok(details)
}

/// Marks an invoice paid or unpaid.
pub async fn set_paid(db: &DatabaseConnection, id: i64, is_paid: bool) -> Result<invoice::Model> {
    let existing = Invoice::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "invoice", id })?;

    let mut invoice: invoice::ActiveModel = existing.into();
    invoice.is_paid = Set(is_paid);
    invoice.update(db).await.map_err(Into::into)
}

/// Archives an invoice. Invoices have no cascade dependents.
pub async fn archive_invoice(db: &DatabaseConnection, id: i64) -> Result<invoice::Model> {
    let existing = Invoice::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "invoice", id })?;

    let mut invoice: invoice::ActiveModel = existing.into();
    invoice.is_archived = Set(true);
    invoice.update(db).await.map_err(Into::into)
}

/// Restores an archived invoice.
pub async fn restore_invoice(db: &DatabaseConnection, id: i64) -> Result<invoice::Model> {
    let existing = Invoice::find_by_id(id)
        .filter(invoice::Column::IsArchived.eq(true))
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "invoice", id })?;

    let mut invoice: invoice::ActiveModel = existing.into();
    invoice.is_archived = Set(false);
    invoice.update(db).await.map_err(Into::into)
}

/// Permanently deletes an archived invoice and its line items.
pub async fn delete_invoice_permanent(db: &DatabaseConnection, id: i64) -> Result<()> {
    let existing = Invoice::find_by_id(id)
        .filter(invoice::Column::IsArchived.eq(true))
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "invoice", id })?;

    let txn = db.begin().await?;
    InvoiceItem::delete_many()
        .filter(invoice_item::Column::InvoiceId.eq(existing.id))
        .exec(&txn)
        .await?;
    existing.delete(&txn).await?;
    txn.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]
    use super::*;
    use crate::{core::service::{ServiceInput, update_service}, test_utils::*};

    #[tokio::test]
    async fn test_create_invoice_snapshots_price() -> Result<()> {
        let db = setup_test_db().await?;
        let patient = create_test_patient(&db, "Jane", "Doe").await?;
        let checkup = create_test_service(&db, "Check-up", 500.0).await?;

        let detail = create_invoice(
            &db,
            Some(patient.id),
            &[LineRequest { service_id: checkup.id, quantity: 2 }],
            None,
        )
        .await?;
        assert_eq!(detail.total_amount, 1000.0);
        assert_eq!(detail.patient_name.as_deref(), Some("Jane Doe"));
        assert_eq!(detail.items[0].service_name_at_time, "Check-up");

        // Raising the catalog price later leaves the billed total alone
        update_service(
            &db,
            checkup.id,
            ServiceInput {
                category: checkup.category,
                name: checkup.name,
                description: String::new(),
                price: Some(750.0),
                active: true,
            },
        )
        .await?;
        let reread = get_invoice(&db, detail.invoice.id).await?;
        assert_eq!(reread.total_amount, 1000.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_invoice_missing_service_rolls_back() -> Result<()> {
        let db = setup_test_db().await?;
        let checkup = create_test_service(&db, "Check-up", 500.0).await?;

        let result = create_invoice(
            &db,
            None,
            &[
                LineRequest { service_id: checkup.id, quantity: 1 },
                LineRequest { service_id: 9999, quantity: 1 },
            ],
            None,
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));

        // Nothing from the aborted request was persisted
        assert!(Invoice::find().all(&db).await?.is_empty());
        assert!(InvoiceItem::find().all(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_invoice_clamps_quantity() -> Result<()> {
        let db = setup_test_db().await?;
        let checkup = create_test_service(&db, "Check-up", 500.0).await?;

        let detail = create_invoice(
            &db,
            None,
            &[LineRequest { service_id: checkup.id, quantity: 0 }],
            None,
        )
        .await?;
        assert_eq!(detail.items[0].quantity, 1);
        assert_eq!(detail.total_amount, 500.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_invoice_walk_in() -> Result<()> {
        let db = setup_test_db().await?;
        let checkup = create_test_service(&db, "Check-up", 500.0).await?;

        let detail = create_invoice(
            &db,
            None,
            &[LineRequest { service_id: checkup.id, quantity: 1 }],
            None,
        )
        .await?;
        assert_eq!(detail.invoice.patient_id, None);
        assert_eq!(detail.patient_name, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_invoice_rejects_empty_and_archived_patient() -> Result<()> {
        let db = setup_test_db().await?;
        let patient = create_test_patient(&db, "Jane", "Doe").await?;
        let checkup = create_test_service(&db, "Check-up", 500.0).await?;

        let result = create_invoice(&db, None, &[], None).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        crate::core::patient::archive_patient(&db, patient.id).await?;
        let result = create_invoice(
            &db,
            Some(patient.id),
            &[LineRequest { service_id: checkup.id, quantity: 1 }],
            None,
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_invoices_filters() -> Result<()> {
        let db = setup_test_db().await?;
        let jane = create_test_patient(&db, "Jane", "Doe").await?;
        let juan = create_test_patient(&db, "Juan", "Cruz").await?;
        let checkup = create_test_service(&db, "Check-up", 500.0).await?;

        create_test_invoice(&db, Some(jane.id), &[(checkup.id, 1)]).await?;
        create_test_invoice(&db, Some(juan.id), &[(checkup.id, 1)]).await?;
        let archived = create_test_invoice(&db, Some(jane.id), &[(checkup.id, 1)]).await?;
        archive_invoice(&db, archived.id).await?;

        assert_eq!(list_invoices(&db, None).await?.len(), 2);
        assert_eq!(list_invoices(&db, Some(jane.id)).await?.len(), 1);
        assert_eq!(list_archived_invoices(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_set_paid() -> Result<()> {
        let db = setup_test_db().await?;
        let checkup = create_test_service(&db, "Check-up", 500.0).await?;
        let invoice = create_test_invoice(&db, None, &[(checkup.id, 1)]).await?;
        assert!(!invoice.is_paid);

        let paid = set_paid(&db, invoice.id, true).await?;
        assert!(paid.is_paid);
        Ok(())
    }

    #[tokio::test]
    async fn test_permanent_delete_removes_items() -> Result<()> {
        let db = setup_test_db().await?;
        let checkup = create_test_service(&db, "Check-up", 500.0).await?;
        let invoice = create_test_invoice(&db, None, &[(checkup.id, 1)]).await?;

        // Must be archived first
        assert!(delete_invoice_permanent(&db, invoice.id).await.is_err());

        archive_invoice(&db, invoice.id).await?;
        delete_invoice_permanent(&db, invoice.id).await?;
        assert!(Invoice::find_by_id(invoice.id).one(&db).await?.is_none());
        assert!(InvoiceItem::find().all(&db).await?.is_empty());
        Ok(())
    }
}
