use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::{credentials_match, generate_token, CurrentAccount};
use crate::db::{accounts, dashboard};
use crate::handlers::required;
use crate::models::AccountPublic;
use crate::utils::error::AppError;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LoginPayload {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginSuccess {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: AccountPublic,
}

#[derive(Debug, Serialize)]
pub struct LoginFailure {
    pub success: bool,
    pub message: String,
    pub errors: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub success: bool,
    pub message: String,
}

fn unauthorized(message: &str, errors: Map<String, Value>) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(LoginFailure {
            success: false,
            message: message.to_string(),
            errors,
        }),
    )
        .into_response()
}

/// Exchange the configured credential pair for the account's session token.
/// Issuance is idempotent: logging in again returns the same token. The
/// failure message never reveals which credential was wrong.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Response, AppError> {
    let username = payload.username.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let mut errors = Map::new();
    if username.is_empty() {
        required(&mut errors, "username");
    }
    if password.is_empty() {
        required(&mut errors, "password");
    }
    if !errors.is_empty() {
        return Ok(unauthorized(
            "Both username and password are required",
            errors,
        ));
    }

    if !credentials_match(&username, &password, &state.config.admin) {
        return Ok(unauthorized("Invalid credentials", Map::new()));
    }

    let account = accounts::get_by_username(&state.db, &username)
        .await?
        .ok_or_else(|| {
            AppError::InternalServerError("Admin account is not provisioned".to_string())
        })?;

    let token = accounts::fetch_or_create_token(&state.db, account.id, generate_token()).await?;

    Ok(Json(LoginSuccess {
        success: true,
        message: "Login successful".to_string(),
        token,
        user: account.into(),
    })
    .into_response())
}

/// Revoke the caller's token. Deliberately not idempotent: revoking an
/// already-absent token answers 400.
pub async fn logout(
    State(state): State<AppState>,
    account: CurrentAccount,
) -> Result<Response, AppError> {
    if accounts::delete_token(&state.db, account.id).await? {
        Ok(Json(StatusMessage {
            success: true,
            message: "Logged out successfully".to_string(),
        })
        .into_response())
    } else {
        Ok((
            StatusCode::BAD_REQUEST,
            Json(StatusMessage {
                success: false,
                message: "Token not found".to_string(),
            }),
        )
            .into_response())
    }
}

pub async fn dashboard(
    State(state): State<AppState>,
    _account: CurrentAccount,
) -> Result<Response, AppError> {
    let summary = dashboard::summary(&state.db).await?;
    Ok(Json(summary).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_login_success_body_shape() {
        let body = LoginSuccess {
            success: true,
            message: "Login successful".to_string(),
            token: "abc".to_string(),
            user: AccountPublic {
                id: Uuid::new_v4(),
                username: "admin".to_string(),
                email: "admin@example.com".to_string(),
                first_name: "Site".to_string(),
                last_name: "Admin".to_string(),
                is_admin: true,
            },
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["token"], "abc");
        assert_eq!(json["user"]["username"], "admin");
        assert_eq!(json["user"]["is_admin"], true);
    }

    #[test]
    fn test_login_failure_body_shape() {
        let mut errors = Map::new();
        required(&mut errors, "username");

        let body = LoginFailure {
            success: false,
            message: "Both username and password are required".to_string(),
            errors,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["errors"]["username"], "This field is required.");
    }
}
