//! Invoice item entity - One line of an invoice.
//!
//! Captures a point-in-time copy of the service's name and price so later
//! catalog edits never change historical invoices. `service_id` is nullable;
//! it is cleared when a service is permanently deleted while the snapshot
//! fields keep the line meaningful.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Invoice line item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoice_items")]
pub struct Model {
    /// Unique identifier for the line item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning invoice
    pub invoice_id: i64,
    /// Catalog service this line was created from, if it still exists
    pub service_id: Option<i64>,
    /// Service name captured at invoicing time
    pub service_name_at_time: String,
    /// Service price captured at invoicing time
    pub price_at_time: f64,
    /// Number of units sold, always at least 1
    pub quantity: i32,
}

impl Model {
    /// Line total: snapshot price times quantity.
    #[must_use]
    pub fn total_price(&self) -> f64 {
        self.price_at_time * f64::from(self.quantity)
    }
}

/// Defines relationships between InvoiceItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line item belongs to one invoice
    #[sea_orm(
        belongs_to = "super::invoice::Entity",
        from = "Column::InvoiceId",
        to = "super::invoice::Column::Id"
    )]
    Invoice,
    /// Each line item may reference one catalog service
    #[sea_orm(
        belongs_to = "super::service::Entity",
        from = "Column::ServiceId",
        to = "super::service::Column::Id"
    )]
    Service,
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoice.def()
    }
}

impl Related<super::service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Service.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
