use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use base64::{engine::general_purpose, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::config::AdminCredentials;
use crate::db::accounts;
use crate::utils::error::AppError;
use crate::AppState;

const TOKEN_BYTES: usize = 32;

/// Generate an opaque bearer token: 32 bytes from the OS RNG, base64url
/// without padding (43 characters).
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Compare a supplied credential pair against the configured one without
/// leaking timing. Both comparisons always run; the verdicts are combined
/// afterwards so a matching username alone is indistinguishable from a full
/// mismatch.
pub fn credentials_match(username: &str, password: &str, configured: &AdminCredentials) -> bool {
    let username_ok = username.as_bytes().ct_eq(configured.username.as_bytes());
    let password_ok = password.as_bytes().ct_eq(configured.password.as_bytes());
    bool::from(username_ok & password_ok)
}

/// Pull the token out of an `Authorization` header value. Accepts the
/// `Token` scheme and `Bearer` as an equivalent.
pub fn parse_authorization(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    if scheme.eq_ignore_ascii_case("token") || scheme.eq_ignore_ascii_case("bearer") {
        Some(token)
    } else {
        None
    }
}

/// The authenticated caller, resolved from the bearer token. Using this
/// extractor in a handler signature is what makes a route require
/// authentication; `is_admin` is the seam where further roles would hang.
#[derive(Debug, Clone)]
pub struct CurrentAccount {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::AuthError("Authentication credentials were not provided".to_string())
            })?;

        let token = parse_authorization(header_value)
            .ok_or_else(|| AppError::AuthError("Invalid authorization header".to_string()))?;

        let account = accounts::get_by_token(&state.db, token)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid token".to_string()))?;

        Ok(CurrentAccount {
            id: account.id,
            username: account.username,
            email: account.email,
            is_admin: account.is_admin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> AdminCredentials {
        AdminCredentials {
            username: "admin".to_string(),
            password: "s3cret-pass".to_string(),
            email: "admin@example.com".to_string(),
            first_name: "Site".to_string(),
            last_name: "Admin".to_string(),
        }
    }

    #[test]
    fn test_generated_tokens_are_unique_and_fixed_length() {
        let a = generate_token();
        let b = generate_token();

        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
        assert_eq!(b.len(), 43);
        assert!(a
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert!(!a.contains('='));
    }

    #[test]
    fn test_credentials_match_exact_pair_only() {
        let cfg = configured();

        assert!(credentials_match("admin", "s3cret-pass", &cfg));
        assert!(!credentials_match("admin", "s3cret-pas", &cfg));
        assert!(!credentials_match("admin", "s3cret-pass ", &cfg));
        assert!(!credentials_match("Admin", "s3cret-pass", &cfg));
        assert!(!credentials_match("admin", "", &cfg));
        assert!(!credentials_match("", "", &cfg));
    }

    #[test]
    fn test_parse_authorization_accepts_token_and_bearer() {
        assert_eq!(parse_authorization("Token abc123"), Some("abc123"));
        assert_eq!(parse_authorization("Bearer abc123"), Some("abc123"));
        assert_eq!(parse_authorization("token abc123"), Some("abc123"));
        assert_eq!(parse_authorization("BEARER abc123"), Some("abc123"));
    }

    #[test]
    fn test_parse_authorization_rejects_other_shapes() {
        assert_eq!(parse_authorization("Basic abc123"), None);
        assert_eq!(parse_authorization("Token "), None);
        assert_eq!(parse_authorization("Token"), None);
        assert_eq!(parse_authorization(""), None);
    }
}
