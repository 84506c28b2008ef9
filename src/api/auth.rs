//! Login, registration, and logout for the three surfaces.
//!
//! The JSON API issues a long-lived per-account token. The back-office and
//! POS issue per-login sessions; only the back-office login sets the
//! front-desk flag the admin guard requires.

use crate::{
    api::{
        AppState,
        extract::{AdminSession, ApiUser, PosSession},
    },
    core::{auth, staff},
    entities::{Position, StaffProfile, staff_profile},
    errors::{Error, Result},
};
use axum::{Json, extract::State, http::StatusCode};
use sea_orm::prelude::*;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterRequest {
    username: String,
    email: String,
    password: String,
    first_name: String,
    last_name: String,
    #[serde(default)]
    position: Position,
}

/// `POST /api/auth/login` - issues the account's API token.
///
/// The token is only issued to staff accounts that are active; either flag
/// missing is a 403 even with correct credentials.
pub async fn api_login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>> {
    let account = auth::authenticate(&state.db, &body.username, &body.password).await?;
    if !account.is_staff {
        return Err(Error::Forbidden {
            message: "account is not staff".to_string(),
        });
    }
    if !account.is_active {
        return Err(Error::Forbidden {
            message: "account is pending approval".to_string(),
        });
    }
    let token = auth::issue_api_token(&state.db, account.id).await?;
    let position = StaffProfile::find()
        .filter(staff_profile::Column::UserId.eq(account.id))
        .one(&state.db)
        .await?
        .map(|p| p.position);
    tracing::info!(username = %account.username, "api login");
    Ok(Json(json!({
        "token": token.key,
        "user": {
            "id": account.id,
            "username": account.username,
            "email": account.email,
            "first_name": account.first_name,
            "last_name": account.last_name,
            "position": position,
        },
    })))
}

/// `POST /api/auth/register` - creates a pending staff account.
pub async fn api_register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let record = staff::register_staff(
        &state.db,
        staff::StaffRegistration {
            username: body.username,
            email: body.email,
            password: body.password,
            first_name: body.first_name,
            last_name: body.last_name,
            position: body.position,
        },
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "registration received; awaiting approval",
            "user": record.user,
            "profile": record.profile,
        })),
    ))
}

/// `POST /api/auth/logout` - revokes the account's API token.
pub async fn api_logout(
    State(state): State<AppState>,
    ApiUser(account): ApiUser,
) -> Result<Json<Value>> {
    auth::revoke_api_tokens(&state.db, account.id).await?;
    Ok(Json(json!({ "message": "logged out" })))
}

/// `POST /admin/login` - opens a back-office session.
///
/// Only superusers may open one; the session carries the front-desk flag
/// that every `/admin` guard checks.
pub async fn admin_login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>> {
    let account = auth::authenticate(&state.db, &body.username, &body.password).await?;
    if !account.is_superuser {
        return Err(Error::Forbidden {
            message: "administrator account required".to_string(),
        });
    }
    let session = auth::create_session(&state.db, account.id, true).await?;
    tracing::info!(username = %account.username, "back-office login");
    Ok(Json(json!({ "session": session.key, "user": account })))
}

/// `POST /admin/logout` - closes the back-office session.
pub async fn admin_logout(
    State(state): State<AppState>,
    admin: AdminSession,
) -> Result<Json<Value>> {
    auth::delete_session(&state.db, &admin.session.key).await?;
    Ok(Json(json!({ "message": "logged out" })))
}

/// `POST /pos/login` - opens a POS session for approved staff.
pub async fn pos_login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>> {
    let account = auth::authenticate(&state.db, &body.username, &body.password).await?;
    if !staff::pos_access_allowed(&state.db, &account).await? {
        return Err(Error::Forbidden {
            message: "account is not approved for the POS".to_string(),
        });
    }
    let session = auth::create_session(&state.db, account.id, false).await?;
    tracing::info!(username = %account.username, "pos login");
    Ok(Json(json!({ "session": session.key, "user": account })))
}

/// `POST /pos/logout` - closes the POS session.
pub async fn pos_logout(State(state): State<AppState>, pos: PosSession) -> Result<Json<Value>> {
    auth::delete_session(&state.db, &pos.session.key).await?;
    Ok(Json(json!({ "message": "logged out" })))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{config::settings::AppSettings, entities::user, test_utils::*};
    use sea_orm::Set;

    fn test_state(db: sea_orm::DatabaseConnection) -> AppState {
        AppState {
            db,
            settings: AppSettings {
                bind_addr: "127.0.0.1:0".to_string(),
                clinic_name: "Test Dental Clinic".to_string(),
                clinic_address: String::new(),
            },
        }
    }

    fn login(username: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: TEST_PASSWORD.to_string(),
        }
    }

    #[tokio::test]
    async fn test_api_login_rejects_non_staff_account() -> Result<()> {
        let db = setup_test_db().await?;
        let account = user::ActiveModel {
            username: Set("civilian".to_string()),
            email: Set("civilian@clinic.test".to_string()),
            password_hash: Set(auth::hash_password(TEST_PASSWORD)),
            first_name: Set(String::new()),
            last_name: Set(String::new()),
            is_staff: Set(false),
            is_active: Set(true),
            is_superuser: Set(false),
            date_joined: Set(chrono::Utc::now()),
            ..Default::default()
        };
        account.insert(&db).await?;

        // Correct credentials on an active account are not enough without
        // the staff flag
        let result = api_login(State(test_state(db)), Json(login("civilian"))).await;
        assert!(matches!(result.unwrap_err(), Error::Forbidden { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_api_login_rejects_inactive_staff() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_staff(&db, "bob", false).await?;

        let result = api_login(State(test_state(db)), Json(login("bob"))).await;
        assert!(matches!(result.unwrap_err(), Error::Forbidden { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_api_login_issues_token_to_active_staff() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_staff(&db, "alice", true).await?;

        let Json(body) = api_login(State(test_state(db)), Json(login("alice"))).await?;
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(body["user"]["username"], "alice");
        Ok(())
    }
}
