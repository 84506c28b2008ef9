//! Session entity - Per-login sessions for the human surfaces.
//!
//! `frontend_authenticated` records that the holder logged in through the
//! back-office login specifically; an otherwise-authenticated superuser
//! without this flag is still denied admin routes. POS logins create sessions
//! with the flag unset.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Session database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    /// Opaque session key returned by login
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    /// Account this session authenticates
    pub user_id: i64,
    /// Set only by an explicit back-office login
    pub frontend_authenticated: bool,
    /// When the session was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Session and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each session belongs to one user account
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
