//! Invoice entity - One sale, composed of snapshotted line items.
//!
//! `patient_id` is nullable so a walk-in quick sale can exist without a
//! patient record, and so deleting a patient preserves invoice history. The
//! total amount is never stored; it is always recomputed from the items.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Invoice database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    /// Unique identifier for the invoice
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Patient billed, if any (None for walk-ins and deleted patients)
    pub patient_id: Option<i64>,
    /// When the invoice was created; set once, never updated
    pub date_created: DateTimeUtc,
    /// Whether the invoice has been paid
    pub is_paid: bool,
    /// Staff account that created the invoice, if known
    pub created_by: Option<i64>,
    /// Soft delete flag - set directly or via patient/service cascade
    pub is_archived: bool,
}

/// Defines relationships between Invoice and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each invoice may belong to one patient
    #[sea_orm(
        belongs_to = "super::patient::Entity",
        from = "Column::PatientId",
        to = "super::patient::Column::Id"
    )]
    Patient,
    /// Staff account that created this invoice
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    CreatedBy,
    /// One invoice owns many line items
    #[sea_orm(has_many = "super::invoice_item::Entity")]
    Items,
}

impl Related<super::patient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Patient.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreatedBy.def()
    }
}

impl Related<super::invoice_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
