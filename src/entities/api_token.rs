//! API token entity - Bearer tokens for the mobile JSON API.
//!
//! One token per account, created on first API login and reused on subsequent
//! logins until logout deletes it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// API token database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "api_tokens")]
pub struct Model {
    /// Opaque token key presented as `Authorization: Bearer <key>`
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    /// Owning account; at most one token per account
    #[sea_orm(unique)]
    pub user_id: i64,
    /// When the token was issued
    pub created_at: DateTimeUtc,
}

/// Defines relationships between ApiToken and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each token belongs to one user account
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
