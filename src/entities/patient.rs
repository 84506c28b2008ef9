//! Patient entity - Clinic patient records.
//!
//! Contact fields may be blank so the POS can create a minimal walk-in record.
//! Archiving a patient cascades to that patient's invoices; permanent deletion
//! nulls the invoice reference instead of deleting invoice history.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Patient database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "patients")]
pub struct Model {
    /// Unique identifier for the patient
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Phone number, may be blank
    pub contact_number: String,
    /// Email address, may be blank
    pub email: String,
    /// Postal address, may be blank
    pub address: String,
    /// Staff account that created the record, if known
    pub created_by: Option<i64>,
    /// When the record was created
    pub created_at: DateTimeUtc,
    /// Soft delete flag - archived patients are hidden from listings
    pub is_archived: bool,
}

impl Model {
    /// Display name used in invoices and reports.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Defines relationships between Patient and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One patient has many invoices
    #[sea_orm(has_many = "super::invoice::Entity")]
    Invoices,
    /// Staff account that created this patient
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    CreatedBy,
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreatedBy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
