//! Authentication business logic.
//!
//! Passwords are hashed with PBKDF2-HMAC-SHA256 into a self-describing
//! `pbkdf2_sha256$iterations$salt$hash` string, so the iteration count can be
//! raised without invalidating stored hashes. API tokens are one-per-account
//! and reused across logins; sessions are per-login rows that carry the
//! explicit `frontend_authenticated` flag for the back-office guard.

use crate::{
    entities::{ApiToken, Session, User, api_token, session, user},
    errors::{Error, Result},
};
use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sea_orm::{Set, prelude::*};
use sha2::Sha256;
use subtle::ConstantTimeEq;

const PBKDF2_ITERATIONS: u32 = 100_000;
const SALT_LENGTH: usize = 16;
const HASH_LENGTH: usize = 32;
const ALGORITHM: &str = "pbkdf2_sha256";

/// Hashes a password into the stored `pbkdf2_sha256$iterations$salt$hash` form.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);

    let mut derived = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, PBKDF2_ITERATIONS, &mut derived);

    format!(
        "{ALGORITHM}${PBKDF2_ITERATIONS}${}${}",
        STANDARD_NO_PAD.encode(salt),
        STANDARD_NO_PAD.encode(derived),
    )
}

/// Verifies a password against a stored hash in constant time.
///
/// Malformed stored hashes verify as false rather than erroring, so a
/// corrupted row cannot be used to probe the system.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(algorithm), Some(iterations), Some(salt), Some(hash)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    if algorithm != ALGORITHM || parts.next().is_some() {
        return false;
    }
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (STANDARD_NO_PAD.decode(salt), STANDARD_NO_PAD.decode(hash))
    else {
        return false;
    };

    let mut derived = vec![0u8; expected.len()];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut derived);
    derived.ct_eq(&expected).into()
}

/// Looks up an account by username and checks its password.
///
/// Returns `Unauthorized` for an unknown username or a wrong password, with
/// the same message for both.
pub async fn authenticate(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<user::Model> {
    let account = User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?;

    match account {
        Some(account) if verify_password(password, &account.password_hash) => Ok(account),
        _ => Err(Error::Unauthorized {
            message: "Invalid credentials".to_string(),
        }),
    }
}

/// Returns the account's API token, creating it on first use.
pub async fn issue_api_token(db: &DatabaseConnection, user_id: i64) -> Result<api_token::Model> {
    if let Some(existing) = ApiToken::find()
        .filter(api_token::Column::UserId.eq(user_id))
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    let token = api_token::ActiveModel {
        key: Set(uuid::Uuid::new_v4().simple().to_string()),
        user_id: Set(user_id),
        created_at: Set(chrono::Utc::now()),
    };
    token.insert(db).await.map_err(Into::into)
}

/// Resolves a bearer token to its account, if the token is valid.
pub async fn find_user_by_token(
    db: &DatabaseConnection,
    key: &str,
) -> Result<Option<user::Model>> {
    let Some(token) = ApiToken::find_by_id(key).one(db).await? else {
        return Ok(None);
    };
    User::find_by_id(token.user_id).one(db).await.map_err(Into::into)
}

/// Deletes all API tokens for an account (logout invalidates the token).
pub async fn revoke_api_tokens(db: &DatabaseConnection, user_id: i64) -> Result<()> {
    ApiToken::delete_many()
        .filter(api_token::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Creates a new login session for an account.
///
/// `frontend_authenticated` must be true only for explicit back-office
/// logins; the admin guard rejects sessions without it.
pub async fn create_session(
    db: &DatabaseConnection,
    user_id: i64,
    frontend_authenticated: bool,
) -> Result<session::Model> {
    let session = session::ActiveModel {
        key: Set(uuid::Uuid::new_v4().simple().to_string()),
        user_id: Set(user_id),
        frontend_authenticated: Set(frontend_authenticated),
        created_at: Set(chrono::Utc::now()),
    };
    session.insert(db).await.map_err(Into::into)
}

/// Resolves a session key to the session row and its account.
pub async fn find_session(
    db: &DatabaseConnection,
    key: &str,
) -> Result<Option<(session::Model, user::Model)>> {
    let Some(session) = Session::find_by_id(key).one(db).await? else {
        return Ok(None);
    };
    let Some(account) = User::find_by_id(session.user_id).one(db).await? else {
        return Ok(None);
    };
    Ok(Some((session, account)))
}

/// Deletes a session (logout).
pub async fn delete_session(db: &DatabaseConnection, key: &str) -> Result<()> {
    Session::delete_by_id(key).exec(db).await?;
    Ok(())
}

/// Deletes every session belonging to an account.
pub async fn delete_sessions_for_user(db: &DatabaseConnection, user_id: i64) -> Result<()> {
    Session::delete_many()
        .filter(session::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(())
}
