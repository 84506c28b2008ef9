//! Service catalog business logic.
//!
//! Create/update with the category default-price rule, catalog listings,
//! idempotent seeding of the default catalog, and the archive lifecycle.
//! Archiving a service cascades to every invoice containing one of its line
//! items per the declared policy.

use crate::{
    core::lifecycle::{self, EntityKind},
    entities::{Invoice, InvoiceItem, Service, ServiceCategory, invoice, invoice_item, service},
    errors::{Error, Result},
};
use sea_orm::{
    Iterable, QueryOrder, QuerySelect, Set, TransactionTrait, Unchanged, prelude::*,
    sea_query::Expr,
};

/// Fields accepted when creating or updating a service.
#[derive(Debug, Clone)]
pub struct ServiceInput {
    /// Treatment category
    pub category: ServiceCategory,
    /// Display name, required
    pub name: String,
    /// Optional description
    pub description: String,
    /// Price; `None` or zero falls back to the category default
    pub price: Option<f64>,
    /// Whether the service is sellable
    pub active: bool,
}

fn resolve_price(category: ServiceCategory, price: Option<f64>) -> Result<f64> {
    match price {
        None => Ok(category.default_price()),
        Some(p) if p == 0.0 => Ok(category.default_price()),
        Some(p) if p.is_finite() && p > 0.0 => Ok(p),
        Some(_) => Err(Error::validation("price must be a positive amount")),
    }
}

/// Creates a service, filling an absent or zero price from the category default.
pub async fn create_service(db: &DatabaseConnection, input: ServiceInput) -> Result<service::Model> {
    if input.name.trim().is_empty() {
        return Err(Error::validation("service name is required"));
    }
    let price = resolve_price(input.category, input.price)?;

    let service = service::ActiveModel {
        category: Set(input.category),
        name: Set(input.name.trim().to_string()),
        description: Set(input.description),
        price: Set(price),
        active: Set(input.active),
        is_archived: Set(false),
        ..Default::default()
    };
    service.insert(db).await.map_err(Into::into)
}

/// Lists sellable services for the POS and API: active and not archived.
pub async fn list_sellable_services(db: &DatabaseConnection) -> Result<Vec<service::Model>> {
    Service::find()
        .filter(service::Column::Active.eq(true))
        .filter(service::Column::IsArchived.eq(false))
        .order_by_asc(service::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists all non-archived services for the back-office, including inactive ones.
pub async fn list_services(db: &DatabaseConnection) -> Result<Vec<service::Model>> {
    Service::find()
        .filter(service::Column::IsArchived.eq(false))
        .order_by_asc(service::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists archived services for the archive screen.
pub async fn list_archived_services(db: &DatabaseConnection) -> Result<Vec<service::Model>> {
    Service::find()
        .filter(service::Column::IsArchived.eq(true))
        .order_by_asc(service::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Fetches one service or errors with not-found.
pub async fn get_service(db: &DatabaseConnection, id: i64) -> Result<service::Model> {
    Service::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "service", id })
}

/// Updates a service's catalog fields. The default-price rule applies here
/// too: an absent or zero price resolves to the category default.
pub async fn update_service(
    db: &DatabaseConnection,
    id: i64,
    input: ServiceInput,
) -> Result<service::Model> {
    if input.name.trim().is_empty() {
        return Err(Error::validation("service name is required"));
    }
    let existing = get_service(db, id).await?;
    let price = resolve_price(input.category, input.price)?;

    let service = service::ActiveModel {
        id: Unchanged(existing.id),
        category: Set(input.category),
        name: Set(input.name.trim().to_string()),
        description: Set(input.description),
        price: Set(price),
        active: Set(input.active),
        ..Default::default()
    };
    service.update(db).await.map_err(Into::into)
}

/// Archives a service and, per the cascade policy, every invoice that
/// contains a line item referencing it.
pub async fn archive_service(db: &DatabaseConnection, id: i64) -> Result<()> {
    let existing = get_service(db, id).await?;
    let txn = db.begin().await?;

    let mut service: service::ActiveModel = existing.into();
    service.is_archived = Set(true);
    service.update(&txn).await?;

    if lifecycle::cascades_to_invoices(EntityKind::Service) {
        let invoice_ids: Vec<i64> = InvoiceItem::find()
            .select_only()
            .column(invoice_item::Column::InvoiceId)
            .filter(invoice_item::Column::ServiceId.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;

        if !invoice_ids.is_empty() {
            Invoice::update_many()
                .col_expr(invoice::Column::IsArchived, Expr::value(true))
                .filter(invoice::Column::Id.is_in(invoice_ids))
                .exec(&txn)
                .await?;
        }
    }

    txn.commit().await?;
    Ok(())
}

/// Restores an archived service. Does not restore cascaded invoices.
pub async fn restore_service(db: &DatabaseConnection, id: i64) -> Result<service::Model> {
    let existing = Service::find_by_id(id)
        .filter(service::Column::IsArchived.eq(true))
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "service", id })?;

    let mut service: service::ActiveModel = existing.into();
    service.is_archived = Set(false);
    service.update(db).await.map_err(Into::into)
}

/// Permanently deletes an archived service.
///
/// Line items keep their snapshots; only the catalog reference is cleared.
pub async fn delete_service_permanent(db: &DatabaseConnection, id: i64) -> Result<()> {
    let existing = Service::find_by_id(id)
        .filter(service::Column::IsArchived.eq(true))
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "service", id })?;

    let txn = db.begin().await?;
    InvoiceItem::update_many()
        .col_expr(
            invoice_item::Column::ServiceId,
            Expr::value(Option::<i64>::None),
        )
        .filter(invoice_item::Column::ServiceId.eq(existing.id))
        .exec(&txn)
        .await?;
    existing.delete(&txn).await?;
    txn.commit().await?;
    Ok(())
}

/// Seeds one service per catalog category at its default price.
///
/// Idempotent: categories that already have a service are skipped, so this
/// runs on every server start.
pub async fn seed_default_catalog(db: &DatabaseConnection) -> Result<usize> {
    let mut created = 0;
    for category in ServiceCategory::iter() {
        let exists = Service::find()
            .filter(service::Column::Category.eq(category))
            .one(db)
            .await?
            .is_some();
        if exists {
            continue;
        }

        let service = service::ActiveModel {
            category: Set(category),
            name: Set(category.label().to_string()),
            description: Set(String::new()),
            price: Set(category.default_price()),
            active: Set(true),
            is_archived: Set(false),
            ..Default::default()
        };
        service.insert(db).await?;
        created += 1;
    }

    if created > 0 {
        tracing::info!(created, "seeded default service catalog");
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_service_zero_price_uses_category_default() -> Result<()> {
        let db = setup_test_db().await?;

        let service = create_service(
            &db,
            ServiceInput {
                category: ServiceCategory::Checkup,
                name: "Consultation".to_string(),
                description: String::new(),
                price: Some(0.0),
                active: true,
            },
        )
        .await?;
        assert_eq!(service.price, 500.0);

        let service = create_service(
            &db,
            ServiceInput {
                category: ServiceCategory::Crown,
                name: "Crown work".to_string(),
                description: String::new(),
                price: None,
                active: true,
            },
        )
        .await?;
        assert_eq!(service.price, 8000.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_service_rejects_negative_price() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_service(
            &db,
            ServiceInput {
                category: ServiceCategory::Checkup,
                name: "Bad".to_string(),
                description: String::new(),
                price: Some(-5.0),
                active: true,
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_sellable_excludes_inactive_and_archived() -> Result<()> {
        let db = setup_test_db().await?;
        let active = create_test_service(&db, "Cleaning", 800.0).await?;
        let inactive = create_service(
            &db,
            ServiceInput {
                category: ServiceCategory::Veneers,
                name: "Veneers".to_string(),
                description: String::new(),
                price: Some(12000.0),
                active: false,
            },
        )
        .await?;
        let archived = create_test_service(&db, "Old filling", 900.0).await?;
        archive_service(&db, archived.id).await?;

        let sellable = list_sellable_services(&db).await?;
        assert_eq!(sellable.len(), 1);
        assert_eq!(sellable[0].id, active.id);

        // Back-office listing still shows the inactive one
        let all = list_services(&db).await?;
        assert!(all.iter().any(|s| s.id == inactive.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_archive_service_cascades_to_invoices() -> Result<()> {
        let db = setup_test_db().await?;
        let patient = create_test_patient(&db, "Jane", "Doe").await?;
        let checkup = create_test_service(&db, "Check-up", 500.0).await?;
        let cleaning = create_test_service(&db, "Cleaning", 800.0).await?;

        let with_checkup = create_test_invoice(&db, Some(patient.id), &[(checkup.id, 1)]).await?;
        let without = create_test_invoice(&db, Some(patient.id), &[(cleaning.id, 1)]).await?;

        archive_service(&db, checkup.id).await?;

        let archived = Invoice::find_by_id(with_checkup.id).one(&db).await?.unwrap();
        assert!(archived.is_archived);
        let untouched = Invoice::find_by_id(without.id).one(&db).await?.unwrap();
        assert!(!untouched.is_archived);
        Ok(())
    }

    #[tokio::test]
    async fn test_permanent_delete_keeps_item_snapshot() -> Result<()> {
        let db = setup_test_db().await?;
        let service = create_test_service(&db, "Check-up", 500.0).await?;
        let invoice = create_test_invoice(&db, None, &[(service.id, 2)]).await?;

        archive_service(&db, service.id).await?;
        delete_service_permanent(&db, service.id).await?;

        let items = InvoiceItem::find()
            .filter(invoice_item::Column::InvoiceId.eq(invoice.id))
            .all(&db)
            .await?;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].service_id, None);
        assert_eq!(items[0].service_name_at_time, "Check-up");
        assert_eq!(items[0].price_at_time, 500.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_default_catalog_idempotent() -> Result<()> {
        let db = setup_test_db().await?;

        let created = seed_default_catalog(&db).await?;
        assert_eq!(created, ServiceCategory::iter().count());

        let again = seed_default_catalog(&db).await?;
        assert_eq!(again, 0);

        let checkup = Service::find()
            .filter(service::Column::Category.eq(ServiceCategory::Checkup))
            .one(&db)
            .await?
            .unwrap();
        assert_eq!(checkup.price, 500.0);
        Ok(())
    }
}
