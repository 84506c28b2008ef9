//! Request guards.
//!
//! Each surface authenticates from the `Authorization` header: the JSON API
//! with an API token, the back-office and POS with a session key. The guards
//! reject with the right status before a handler body runs.

use crate::{
    api::AppState,
    core::{auth, staff},
    entities::{session, user},
    errors::{Error, Result},
};
use axum::{async_trait, extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};

fn bearer_token(parts: &Parts) -> Result<&str> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(Error::Unauthorized {
            message: "missing Authorization header".to_string(),
        })?;
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("Token "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(Error::Unauthorized {
            message: "malformed Authorization header".to_string(),
        })
}

/// An account authenticated by API token. Inactive accounts are rejected even
/// when the token itself is valid.
#[derive(Debug, Clone)]
pub struct ApiUser(pub user::Model);

#[async_trait]
impl FromRequestParts<AppState> for ApiUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token = bearer_token(parts)?;
        let account = auth::find_user_by_token(&state.db, token)
            .await?
            .ok_or(Error::Unauthorized {
                message: "invalid token".to_string(),
            })?;
        if !account.is_active {
            return Err(Error::Forbidden {
                message: "account is not active".to_string(),
            });
        }
        Ok(Self(account))
    }
}

/// A back-office session: a superuser login that carries the explicit
/// front-desk flag. A valid session without the flag is forbidden, not
/// unauthorized, so the client knows re-login through `/admin/login` is
/// required.
#[derive(Debug, Clone)]
pub struct AdminSession {
    /// The session row
    pub session: session::Model,
    /// The logged-in superuser
    pub user: user::Model,
}

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let key = bearer_token(parts)?;
        let (session, account) =
            auth::find_session(&state.db, key)
                .await?
                .ok_or(Error::Unauthorized {
                    message: "invalid session".to_string(),
                })?;
        if !session.frontend_authenticated {
            return Err(Error::Forbidden {
                message: "session was not opened through the back-office login".to_string(),
            });
        }
        if !account.is_superuser {
            return Err(Error::Forbidden {
                message: "administrator account required".to_string(),
            });
        }
        Ok(Self { session, user: account })
    }
}

/// A POS session: any session whose account passes the POS access check
/// (active staff with an approved, non-archived profile).
#[derive(Debug, Clone)]
pub struct PosSession {
    /// The session row
    pub session: session::Model,
    /// The logged-in staff member
    pub user: user::Model,
}

#[async_trait]
impl FromRequestParts<AppState> for PosSession {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let key = bearer_token(parts)?;
        let (session, account) =
            auth::find_session(&state.db, key)
                .await?
                .ok_or(Error::Unauthorized {
                    message: "invalid session".to_string(),
                })?;
        if !staff::pos_access_allowed(&state.db, &account).await? {
            return Err(Error::Forbidden {
                message: "account is not approved for the POS".to_string(),
            });
        }
        Ok(Self { session, user: account })
    }
}
