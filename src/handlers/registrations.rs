use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::auth::CurrentAccount;
use crate::db::{events, registrations};
use crate::handlers::{blank, required, too_long};
use crate::models::{NewRegistration, RegistrationChanges};
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};
use crate::AppState;

const NAME_MAX: usize = 100;
const EMAIL_MAX: usize = 254;
const PHONE_MAX: usize = 15;

#[derive(Debug, Default, Deserialize)]
pub struct RegistrationPayload {
    pub event: Option<Uuid>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_confirmed: Option<bool>,
}

/// Good-enough structural check: local part, an `@`, and a dotted domain.
fn is_valid_email(value: &str) -> bool {
    if value.len() > EMAIL_MAX || value.chars().any(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

impl RegistrationPayload {
    pub fn validate_create(self) -> Result<NewRegistration, AppError> {
        let mut fields = Map::new();

        let event_id = self.event;
        if event_id.is_none() {
            required(&mut fields, "event");
        }

        let name = match self.name {
            Some(n) if n.trim().is_empty() => {
                blank(&mut fields, "name");
                None
            }
            Some(n) if n.len() > NAME_MAX => {
                too_long(&mut fields, "name", NAME_MAX);
                None
            }
            Some(n) => Some(n),
            None => {
                required(&mut fields, "name");
                None
            }
        };

        let email = match self.email {
            Some(e) if is_valid_email(&e) => Some(e),
            Some(_) => {
                fields.insert("email".to_string(), json!("Enter a valid email address."));
                None
            }
            None => {
                required(&mut fields, "email");
                None
            }
        };

        if let Some(phone) = &self.phone {
            if phone.len() > PHONE_MAX {
                too_long(&mut fields, "phone", PHONE_MAX);
            }
        }

        match (event_id, name, email, fields.is_empty()) {
            (Some(event_id), Some(name), Some(email), true) => Ok(NewRegistration {
                event_id,
                name,
                email,
                phone: self.phone,
            }),
            _ => Err(AppError::fields("Invalid registration payload", fields)),
        }
    }

    pub fn validate_update(self) -> Result<RegistrationChanges, AppError> {
        let mut fields = Map::new();

        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                blank(&mut fields, "name");
            } else if name.len() > NAME_MAX {
                too_long(&mut fields, "name", NAME_MAX);
            }
        }
        if let Some(email) = &self.email {
            if !is_valid_email(email) {
                fields.insert("email".to_string(), json!("Enter a valid email address."));
            }
        }
        if let Some(phone) = &self.phone {
            if phone.len() > PHONE_MAX {
                too_long(&mut fields, "phone", PHONE_MAX);
            }
        }

        if !fields.is_empty() {
            return Err(AppError::fields("Invalid registration payload", fields));
        }

        Ok(RegistrationChanges {
            name: self.name,
            email: self.email,
            phone: self.phone,
            is_confirmed: self.is_confirmed,
        })
    }
}

pub async fn list(
    State(state): State<AppState>,
    _account: CurrentAccount,
) -> Result<Response, AppError> {
    let registrations = registrations::list(&state.db).await?;
    Ok(success(registrations, "Registrations retrieved").into_response())
}

/// Sub-resource listing: every registration for one event.
pub async fn list_for_event(
    State(state): State<AppState>,
    _account: CurrentAccount,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    if !events::exists(&state.db, event_id).await? {
        return Err(AppError::NotFound("Event not found".to_string()));
    }

    let registrations = registrations::list_for_event(&state.db, event_id).await?;
    Ok(success(registrations, "Registrations retrieved").into_response())
}

pub async fn retrieve(
    State(state): State<AppState>,
    _account: CurrentAccount,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let registration = registrations::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Registration not found".to_string()))?;

    Ok(success(registration, "Registration retrieved").into_response())
}

/// Open to anonymous callers; the business rules live in the db layer so
/// the capacity check and the insert share one transaction.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<RegistrationPayload>,
) -> Result<Response, AppError> {
    let new_registration = payload.validate_create()?;
    let registration = registrations::create(&state.db, &new_registration).await?;

    Ok(created(registration, "Registration created").into_response())
}

pub async fn update(
    State(state): State<AppState>,
    _account: CurrentAccount,
    Path(id): Path<Uuid>,
    Json(payload): Json<RegistrationPayload>,
) -> Result<Response, AppError> {
    let changes = payload.validate_update()?;
    let registration = registrations::update(&state.db, id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound("Registration not found".to_string()))?;

    Ok(success(registration, "Registration updated").into_response())
}

pub async fn destroy(
    State(state): State<AppState>,
    _account: CurrentAccount,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    if !registrations::delete(&state.db, id).await? {
        return Err(AppError::NotFound("Registration not found".to_string()));
    }

    Ok(empty_success("Registration deleted").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_payload() -> RegistrationPayload {
        RegistrationPayload {
            event: Some(Uuid::new_v4()),
            name: Some("Ada Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            ..Default::default()
        }
    }

    fn field_errors(err: AppError) -> Map<String, Value> {
        match err {
            AppError::ValidationError {
                fields: Some(Value::Object(map)),
                ..
            } => map,
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));

        assert!(!is_valid_email("ada"));
        assert!(!is_valid_email("ada@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada@.example.com"));
        assert!(!is_valid_email("ada@example.com."));
        assert!(!is_valid_email("ada @example.com"));
    }

    #[test]
    fn test_create_requires_event_name_email() {
        let fields = field_errors(
            RegistrationPayload::default()
                .validate_create()
                .unwrap_err(),
        );

        assert!(fields.contains_key("event"));
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn test_create_rejects_bad_email() {
        let payload = RegistrationPayload {
            email: Some("not-an-email".to_string()),
            ..valid_payload()
        };
        let fields = field_errors(payload.validate_create().unwrap_err());
        assert_eq!(fields["email"], "Enter a valid email address.");
    }

    #[test]
    fn test_create_rejects_overlong_phone() {
        let payload = RegistrationPayload {
            phone: Some("0".repeat(16)),
            ..valid_payload()
        };
        let fields = field_errors(payload.validate_create().unwrap_err());
        assert!(fields.contains_key("phone"));
    }

    #[test]
    fn test_create_passes_through_valid_payload() {
        let registration = valid_payload().validate_create().unwrap();
        assert_eq!(registration.name, "Ada Lovelace");
        assert_eq!(registration.email, "ada@example.com");
        assert!(registration.phone.is_none());
    }

    #[test]
    fn test_update_checks_only_supplied_fields() {
        let changes = RegistrationPayload {
            is_confirmed: Some(false),
            ..Default::default()
        }
        .validate_update()
        .unwrap();

        assert_eq!(changes.is_confirmed, Some(false));
        assert!(changes.email.is_none());
    }
}
