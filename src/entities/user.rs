//! User entity - Represents login accounts for every surface.
//!
//! Superusers reach the back-office, approved staff reach the POS, and staff
//! accounts also authenticate against the mobile API. Passwords are stored as
//! PBKDF2 hashes; the `password_hash` field never leaves the server.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User account database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the account
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name, unique across all accounts
    #[sea_orm(unique)]
    pub username: String,
    /// Contact email, unique across all accounts
    #[sea_orm(unique)]
    pub email: String,
    /// PBKDF2-SHA256 password hash (`pbkdf2_sha256$iterations$salt$hash`)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Whether this account belongs to a staff member
    pub is_staff: bool,
    /// Account-enable flag; kept in sync with profile approval
    pub is_active: bool,
    /// Whether this account may use the back-office
    pub is_superuser: bool,
    /// When the account was created
    pub date_joined: DateTimeUtc,
}

impl Model {
    /// Full name, falling back to the username when both name fields are blank.
    #[must_use]
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.username.clone()
        } else {
            name.to_string()
        }
    }
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each staff account has at most one profile
    #[sea_orm(has_many = "super::staff_profile::Entity")]
    StaffProfiles,
    /// Invoices created by this account
    #[sea_orm(has_many = "super::invoice::Entity")]
    Invoices,
    /// Patients created by this account
    #[sea_orm(has_many = "super::patient::Entity")]
    Patients,
    /// API bearer token (one per account)
    #[sea_orm(has_many = "super::api_token::Entity")]
    ApiTokens,
    /// Login sessions for the human surfaces
    #[sea_orm(has_many = "super::session::Entity")]
    Sessions,
}

impl Related<super::staff_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StaffProfiles.def()
    }
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl Related<super::patient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Patients.def()
    }
}

impl Related<super::api_token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ApiTokens.def()
    }
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
