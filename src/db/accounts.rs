use sqlx::PgPool;

use crate::config::AdminCredentials;
use crate::models::Account;
use crate::utils::error::AppError;

/// Idempotently materialize the configured admin account. Run at startup,
/// never from the login path.
#[tracing::instrument(skip_all, fields(username = %admin.username), err)]
pub async fn ensure_admin(pool: &PgPool, admin: &AdminCredentials) -> Result<Account, AppError> {
    sqlx::query(
        r#"
        INSERT INTO accounts (username, email, first_name, last_name, is_admin)
        VALUES ($1, $2, $3, $4, TRUE)
        ON CONFLICT (username) DO NOTHING
        "#,
    )
    .bind(&admin.username)
    .bind(&admin.email)
    .bind(&admin.first_name)
    .bind(&admin.last_name)
    .execute(pool)
    .await?;

    let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE username = $1")
        .bind(&admin.username)
        .fetch_one(pool)
        .await?;

    Ok(account)
}

pub async fn get_by_username(pool: &PgPool, username: &str) -> Result<Option<Account>, AppError> {
    let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(account)
}

/// Resolve a bearer token to its account, if the token is active.
pub async fn get_by_token(pool: &PgPool, token: &str) -> Result<Option<Account>, AppError> {
    let account = sqlx::query_as::<_, Account>(
        r#"
        SELECT a.*
        FROM accounts a
        JOIN session_tokens t ON t.account_id = a.id
        WHERE t.token = $1
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(account)
}

/// Get the account's session token, creating it from `candidate` if none
/// exists. Re-login therefore returns the existing token rather than
/// rotating it.
#[tracing::instrument(skip_all, err)]
pub async fn fetch_or_create_token(
    pool: &PgPool,
    account_id: uuid::Uuid,
    candidate: String,
) -> Result<String, AppError> {
    sqlx::query(
        r#"
        INSERT INTO session_tokens (token, account_id)
        VALUES ($1, $2)
        ON CONFLICT (account_id) DO NOTHING
        "#,
    )
    .bind(&candidate)
    .bind(account_id)
    .execute(pool)
    .await?;

    let token: String =
        sqlx::query_scalar("SELECT token FROM session_tokens WHERE account_id = $1")
            .bind(account_id)
            .fetch_one(pool)
            .await?;

    Ok(token)
}

/// Delete the account's session token. Returns false when there was none.
#[tracing::instrument(skip_all, err)]
pub async fn delete_token(pool: &PgPool, account_id: uuid::Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM session_tokens WHERE account_id = $1")
        .bind(account_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
