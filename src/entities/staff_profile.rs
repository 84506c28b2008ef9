//! Staff profile entity - One-to-one extension of a user account.
//!
//! Carries the clinic position and the approval workflow state. A freshly
//! registered profile is unapproved and its account inactive; a superuser
//! approval flips both. `approved` is the authoritative POS-access bit.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Clinic position held by a staff member.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, Default,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Dentist
    #[sea_orm(string_value = "dentist")]
    Dentist,
    /// Dental hygienist
    #[sea_orm(string_value = "hygienist")]
    Hygienist,
    /// Dental assistant
    #[sea_orm(string_value = "assistant")]
    Assistant,
    /// Receptionist
    #[sea_orm(string_value = "receptionist")]
    Receptionist,
    /// Administrator
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Manager
    #[sea_orm(string_value = "manager")]
    Manager,
    /// Anything else
    #[default]
    #[sea_orm(string_value = "other")]
    Other,
}

impl Position {
    /// Human-readable label for listings and API responses.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dentist => "Dentist",
            Self::Hygienist => "Dental Hygienist",
            Self::Assistant => "Dental Assistant",
            Self::Receptionist => "Receptionist",
            Self::Admin => "Administrator",
            Self::Manager => "Manager",
            Self::Other => "Other",
        }
    }
}

/// Staff profile database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "staff_profiles")]
pub struct Model {
    /// Unique identifier for the profile
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user account; exactly one profile per account
    #[sea_orm(unique)]
    pub user_id: i64,
    /// Clinic position
    pub position: Position,
    /// When the profile was created (registration time)
    pub created_at: DateTimeUtc,
    /// Whether a superuser has approved this staff member for POS access
    pub approved: bool,
    /// Soft delete flag - archived profiles are hidden from staff listings
    pub is_archived: bool,
}

/// Defines relationships between StaffProfile and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each profile belongs to one user account
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
