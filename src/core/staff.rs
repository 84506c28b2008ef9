//! Staff registration and the approval workflow.
//!
//! New registrations create an inactive account plus a pending profile. An
//! administrator either approves (activating the account) or rejects (deleting
//! account and profile outright). `profile.approved` is the authoritative
//! approval state; `user.is_active` is kept in sync with it through the
//! archive lifecycle.

use crate::{
    core::auth,
    entities::{
        ApiToken, Position, Session, StaffProfile, User, api_token, session, staff_profile, user,
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Select, Set, TransactionTrait, prelude::*};
use serde::Serialize;

/// Fields accepted when registering a staff account.
#[derive(Debug, Clone)]
pub struct StaffRegistration {
    /// Login name, required and unique
    pub username: String,
    /// Email, required and unique
    pub email: String,
    /// Plaintext password, hashed before storage
    pub password: String,
    /// Given name, required
    pub first_name: String,
    /// Family name, required
    pub last_name: String,
    /// Clinic role
    pub position: Position,
}

/// A staff account joined with its profile, for listings.
#[derive(Debug, Clone, Serialize)]
pub struct StaffRecord {
    /// The account
    pub user: user::Model,
    /// The profile
    pub profile: staff_profile::Model,
}

fn validate(input: &StaffRegistration) -> Result<()> {
    for (field, value) in [
        ("username", &input.username),
        ("email", &input.email),
        ("first_name", &input.first_name),
        ("last_name", &input.last_name),
    ] {
        if value.trim().is_empty() {
            return Err(Error::validation(format!("{field} is required")));
        }
    }
    if input.password.len() < 8 {
        return Err(Error::validation("password must be at least 8 characters"));
    }
    if input.password.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::validation("password cannot be entirely numeric"));
    }
    Ok(())
}

/// Registers a staff account in the pending state.
///
/// The account starts inactive and the profile unapproved; the account cannot
/// log in to the POS until an administrator approves it.
pub async fn register_staff(
    db: &DatabaseConnection,
    input: StaffRegistration,
) -> Result<StaffRecord> {
    validate(&input)?;

    let username = input.username.trim().to_string();
    let email = input.email.trim().to_string();
    if User::find()
        .filter(user::Column::Username.eq(&username))
        .one(db)
        .await?
        .is_some()
    {
        return Err(Error::Conflict {
            message: "username is already taken".to_string(),
        });
    }
    if User::find()
        .filter(user::Column::Email.eq(&email))
        .one(db)
        .await?
        .is_some()
    {
        return Err(Error::Conflict {
            message: "email is already registered".to_string(),
        });
    }

    let txn = db.begin().await?;
    let account = user::ActiveModel {
        username: Set(username),
        email: Set(email),
        password_hash: Set(auth::hash_password(&input.password)),
        first_name: Set(input.first_name.trim().to_string()),
        last_name: Set(input.last_name.trim().to_string()),
        is_staff: Set(true),
        is_active: Set(false),
        is_superuser: Set(false),
        date_joined: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let account = account.insert(&txn).await?;

    let profile = staff_profile::ActiveModel {
        user_id: Set(account.id),
        position: Set(input.position),
        created_at: Set(chrono::Utc::now()),
        approved: Set(false),
        is_archived: Set(false),
        ..Default::default()
    };
    let profile = profile.insert(&txn).await?;
    txn.commit().await?;

    tracing::info!(username = %account.username, "staff registration pending approval");
    Ok(StaffRecord { user: account, profile })
}

async fn profile_with_user(
    db: &DatabaseConnection,
    profile_id: i64,
) -> Result<(staff_profile::Model, user::Model)> {
    let Some((profile, Some(account))) = StaffProfile::find_by_id(profile_id)
        .find_also_related(User)
        .one(db)
        .await?
    else {
        return Err(Error::NotFound {
            entity: "staff profile",
            id: profile_id,
        });
    };
    Ok((profile, account))
}

/// Lists unapproved, non-archived profiles awaiting review, oldest first.
pub async fn pending_staff(db: &DatabaseConnection) -> Result<Vec<StaffRecord>> {
    collect_staff(
        db,
        StaffProfile::find()
            .filter(staff_profile::Column::Approved.eq(false))
            .filter(staff_profile::Column::IsArchived.eq(false))
            .order_by_asc(staff_profile::Column::CreatedAt),
    )
    .await
}

/// Lists approved, non-archived staff.
pub async fn list_active_staff(db: &DatabaseConnection) -> Result<Vec<StaffRecord>> {
    collect_staff(
        db,
        StaffProfile::find()
            .filter(staff_profile::Column::Approved.eq(true))
            .filter(staff_profile::Column::IsArchived.eq(false))
            .order_by_asc(staff_profile::Column::CreatedAt),
    )
    .await
}

/// Lists archived staff profiles for the archive screen.
pub async fn list_archived_staff(db: &DatabaseConnection) -> Result<Vec<StaffRecord>> {
    collect_staff(
        db,
        StaffProfile::find()
            .filter(staff_profile::Column::IsArchived.eq(true))
            .order_by_asc(staff_profile::Column::CreatedAt),
    )
    .await
}

async fn collect_staff(
    db: &DatabaseConnection,
    query: Select<StaffProfile>,
) -> Result<Vec<StaffRecord>> {
    let rows = query.find_also_related(User).all(db).await?;
    Ok(rows
        .into_iter()
        .filter_map(|(profile, account)| account.map(|user| StaffRecord { user, profile }))
        .collect())
}

/// Approves a pending profile, activating its account.
pub async fn approve_staff(db: &DatabaseConnection, profile_id: i64) -> Result<StaffRecord> {
    let (profile, account) = profile_with_user(db, profile_id).await?;
    let txn = db.begin().await?;

    let mut profile: staff_profile::ActiveModel = profile.into();
    profile.approved = Set(true);
    let profile = profile.update(&txn).await?;

    let mut account: user::ActiveModel = account.into();
    account.is_active = Set(true);
    let account = account.update(&txn).await?;

    txn.commit().await?;
    tracing::info!(username = %account.username, "staff approved");
    Ok(StaffRecord { user: account, profile })
}

/// Rejects a pending profile, deleting the profile and its account along with
/// any tokens or sessions the account held.
pub async fn reject_staff(db: &DatabaseConnection, profile_id: i64) -> Result<()> {
    let (profile, account) = profile_with_user(db, profile_id).await?;
    if profile.approved {
        return Err(Error::Conflict {
            message: "cannot reject an approved profile; archive it instead".to_string(),
        });
    }

    let txn = db.begin().await?;
    ApiToken::delete_many()
        .filter(api_token::Column::UserId.eq(account.id))
        .exec(&txn)
        .await?;
    Session::delete_many()
        .filter(session::Column::UserId.eq(account.id))
        .exec(&txn)
        .await?;
    let username = account.username.clone();
    profile.delete(&txn).await?;
    account.delete(&txn).await?;
    txn.commit().await?;

    tracing::info!(username = %username, "staff registration rejected");
    Ok(())
}

/// Archives a staff profile and deactivates its account.
pub async fn archive_staff(db: &DatabaseConnection, profile_id: i64) -> Result<StaffRecord> {
    let (profile, account) = profile_with_user(db, profile_id).await?;
    let txn = db.begin().await?;

    let mut profile: staff_profile::ActiveModel = profile.into();
    profile.is_archived = Set(true);
    let profile = profile.update(&txn).await?;

    let mut account: user::ActiveModel = account.into();
    account.is_active = Set(false);
    let account = account.update(&txn).await?;

    txn.commit().await?;
    Ok(StaffRecord { user: account, profile })
}

/// Restores an archived staff profile, reactivating the account only if the
/// profile was already approved.
pub async fn restore_staff(db: &DatabaseConnection, profile_id: i64) -> Result<StaffRecord> {
    let (profile, account) = profile_with_user(db, profile_id).await?;
    if !profile.is_archived {
        return Err(Error::NotFound {
            entity: "staff profile",
            id: profile_id,
        });
    }
    let approved = profile.approved;
    let txn = db.begin().await?;

    let mut profile: staff_profile::ActiveModel = profile.into();
    profile.is_archived = Set(false);
    let profile = profile.update(&txn).await?;

    let mut account: user::ActiveModel = account.into();
    account.is_active = Set(approved);
    let account = account.update(&txn).await?;

    txn.commit().await?;
    Ok(StaffRecord { user: account, profile })
}

/// Permanently deletes an archived staff profile and its account.
pub async fn delete_staff_permanent(db: &DatabaseConnection, profile_id: i64) -> Result<()> {
    let (profile, account) = profile_with_user(db, profile_id).await?;
    if !profile.is_archived {
        return Err(Error::NotFound {
            entity: "staff profile",
            id: profile_id,
        });
    }

    auth::revoke_api_tokens(db, account.id).await?;
    auth::delete_sessions_for_user(db, account.id).await?;

    let txn = db.begin().await?;
    profile.delete(&txn).await?;
    account.delete(&txn).await?;
    txn.commit().await?;
    Ok(())
}

/// Ensures a superuser account with the given username exists, creating it
/// with the supplied credentials when missing. Runs on every server start and
/// never touches an existing account.
pub async fn ensure_superuser(
    db: &DatabaseConnection,
    username: &str,
    email: &str,
    password: &str,
) -> Result<user::Model> {
    if let Some(existing) = User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    let account = user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(auth::hash_password(password)),
        first_name: Set(String::new()),
        last_name: Set(String::new()),
        is_staff: Set(true),
        is_active: Set(true),
        is_superuser: Set(true),
        date_joined: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let account = account.insert(db).await?;
    tracing::info!(username = %account.username, "created superuser account");
    Ok(account)
}

/// Whether an account may use the POS: a staff account that is active with an
/// approved, non-archived profile. No exceptions; a superuser without an
/// approved profile is denied like anyone else.
pub async fn pos_access_allowed(db: &DatabaseConnection, account: &user::Model) -> Result<bool> {
    if !account.is_staff || !account.is_active {
        return Ok(false);
    }
    let profile = StaffProfile::find()
        .filter(staff_profile::Column::UserId.eq(account.id))
        .one(db)
        .await?;
    Ok(profile.is_some_and(|p| p.approved && !p.is_archived))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    fn registration(username: &str) -> StaffRegistration {
        StaffRegistration {
            username: username.to_string(),
            email: format!("{username}@clinic.test"),
            password: TEST_PASSWORD.to_string(),
            first_name: "Bob".to_string(),
            last_name: "Reyes".to_string(),
            position: Position::Assistant,
        }
    }

    #[tokio::test]
    async fn test_register_validations() -> Result<()> {
        let db = setup_test_db().await?;

        let mut bad = registration("bob");
        bad.password = "short".to_string();
        assert!(matches!(
            register_staff(&db, bad).await.unwrap_err(),
            Error::Validation { .. }
        ));

        let mut bad = registration("bob");
        bad.password = "123456789012".to_string();
        assert!(matches!(
            register_staff(&db, bad).await.unwrap_err(),
            Error::Validation { .. }
        ));

        let mut bad = registration("bob");
        bad.first_name = String::new();
        assert!(matches!(
            register_staff(&db, bad).await.unwrap_err(),
            Error::Validation { .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates() -> Result<()> {
        let db = setup_test_db().await?;
        register_staff(&db, registration("bob")).await?;

        assert!(matches!(
            register_staff(&db, registration("bob")).await.unwrap_err(),
            Error::Conflict { .. }
        ));

        let mut same_email = registration("bob2");
        same_email.email = "bob@clinic.test".to_string();
        assert!(matches!(
            register_staff(&db, same_email).await.unwrap_err(),
            Error::Conflict { .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_by_schema() -> Result<()> {
        let db = setup_test_db().await?;
        register_staff(&db, registration("bob")).await?;

        // Bypass the application-level check: the column constraint must
        // still reject a second account with the same email
        let dup = user::ActiveModel {
            username: Set("bob2".to_string()),
            email: Set("bob@clinic.test".to_string()),
            password_hash: Set(auth::hash_password(TEST_PASSWORD)),
            first_name: Set("Bob".to_string()),
            last_name: Set("Reyes".to_string()),
            is_staff: Set(true),
            is_active: Set(false),
            is_superuser: Set(false),
            date_joined: Set(chrono::Utc::now()),
            ..Default::default()
        };
        assert!(dup.insert(&db).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_approval_workflow_gates_pos_access() -> Result<()> {
        let db = setup_test_db().await?;
        let record = register_staff(&db, registration("bob")).await?;

        assert!(!record.user.is_active);
        assert!(!record.profile.approved);
        assert!(!pos_access_allowed(&db, &record.user).await?);

        let pending = pending_staff(&db).await?;
        assert_eq!(pending.len(), 1);

        let approved = approve_staff(&db, record.profile.id).await?;
        assert!(approved.user.is_active);
        assert!(approved.profile.approved);
        assert!(pos_access_allowed(&db, &approved.user).await?);

        assert!(pending_staff(&db).await?.is_empty());
        assert_eq!(list_active_staff(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_reject_deletes_account() -> Result<()> {
        let db = setup_test_db().await?;
        let record = register_staff(&db, registration("bob")).await?;

        reject_staff(&db, record.profile.id).await?;
        assert!(User::find_by_id(record.user.id).one(&db).await?.is_none());
        assert!(
            StaffProfile::find_by_id(record.profile.id)
                .one(&db)
                .await?
                .is_none()
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_reject_refuses_approved_profile() -> Result<()> {
        let db = setup_test_db().await?;
        let record = register_staff(&db, registration("bob")).await?;
        approve_staff(&db, record.profile.id).await?;

        assert!(matches!(
            reject_staff(&db, record.profile.id).await.unwrap_err(),
            Error::Conflict { .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_archive_deactivates_restore_resyncs() -> Result<()> {
        let db = setup_test_db().await?;
        let record = register_staff(&db, registration("bob")).await?;
        let approved = approve_staff(&db, record.profile.id).await?;

        let archived = archive_staff(&db, approved.profile.id).await?;
        assert!(!archived.user.is_active);
        assert!(!pos_access_allowed(&db, &archived.user).await?);

        let restored = restore_staff(&db, archived.profile.id).await?;
        assert!(restored.user.is_active);
        assert!(pos_access_allowed(&db, &restored.user).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_restore_unapproved_stays_inactive() -> Result<()> {
        let db = setup_test_db().await?;
        let record = register_staff(&db, registration("bob")).await?;
        archive_staff(&db, record.profile.id).await?;

        let restored = restore_staff(&db, record.profile.id).await?;
        assert!(!restored.user.is_active);
        assert!(!restored.profile.approved);
        Ok(())
    }

    #[tokio::test]
    async fn test_permanent_delete_requires_archived() -> Result<()> {
        let db = setup_test_db().await?;
        let record = register_staff(&db, registration("bob")).await?;

        assert!(delete_staff_permanent(&db, record.profile.id).await.is_err());

        archive_staff(&db, record.profile.id).await?;
        delete_staff_permanent(&db, record.profile.id).await?;
        assert!(User::find_by_id(record.user.id).one(&db).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_superuser_idempotent() -> Result<()> {
        let db = setup_test_db().await?;

        let first = ensure_superuser(&db, "admin", "admin@clinic.test", TEST_PASSWORD).await?;
        assert!(first.is_superuser);
        assert!(first.is_active);

        // Second run must not replace the account or its password
        let second = ensure_superuser(&db, "admin", "other@clinic.test", "different pass").await?;
        assert_eq!(second.id, first.id);
        assert_eq!(second.password_hash, first.password_hash);
        Ok(())
    }

    #[tokio::test]
    async fn test_superuser_without_profile_denied_pos() -> Result<()> {
        let db = setup_test_db().await?;
        let boss = create_test_superuser(&db, "boss").await?;
        // Superusers get no free pass: the POS gate needs an approved profile
        assert!(!pos_access_allowed(&db, &boss).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_pos_access_requires_every_flag() -> Result<()> {
        let db = setup_test_db().await?;
        let record = register_staff(&db, registration("bob")).await?;
        let approved = approve_staff(&db, record.profile.id).await?;
        assert!(pos_access_allowed(&db, &approved.user).await?);

        // Inactive account
        let mut account: user::ActiveModel = approved.user.clone().into();
        account.is_active = Set(false);
        let inactive = account.update(&db).await?;
        assert!(!pos_access_allowed(&db, &inactive).await?);
        let mut account: user::ActiveModel = inactive.into();
        account.is_active = Set(true);
        let active = account.update(&db).await?;

        // Non-staff account
        let mut account: user::ActiveModel = active.clone().into();
        account.is_staff = Set(false);
        let non_staff = account.update(&db).await?;
        assert!(!pos_access_allowed(&db, &non_staff).await?);
        let mut account: user::ActiveModel = non_staff.into();
        account.is_staff = Set(true);
        let active = account.update(&db).await?;

        // Unapproved profile
        let mut profile: staff_profile::ActiveModel = approved.profile.into();
        profile.approved = Set(false);
        profile.update(&db).await?;
        assert!(!pos_access_allowed(&db, &active).await?);
        Ok(())
    }
}
