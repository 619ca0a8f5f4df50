use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::auth::CurrentAccount;
use crate::db::events;
use crate::handlers::{blank, required, too_long};
use crate::models::{EventChanges, NewEvent};
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};
use crate::AppState;

const DEFAULT_MAX_PARTICIPANTS: i32 = 100;
const TITLE_MAX: usize = 200;
const IMAGE_MAX: usize = 500;
const LOCATION_MAX: usize = 200;

#[derive(Debug, Default, Deserialize)]
pub struct EventPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub image: Option<String>,
    pub location: Option<String>,
    pub max_participants: Option<i32>,
    pub is_active: Option<bool>,
}

impl EventPayload {
    /// Create-time validation: every complaint is collected before the
    /// payload is rejected, so a caller sees all offending fields at once.
    pub fn validate_create(self) -> Result<NewEvent, AppError> {
        let mut fields = Map::new();

        let title = checked_required_text(&mut fields, "title", self.title, Some(TITLE_MAX));
        let description = checked_required_text(&mut fields, "description", self.description, None);
        let date = self.date;
        if date.is_none() {
            required(&mut fields, "date");
        }
        let image = checked_optional_text(&mut fields, "image", self.image, IMAGE_MAX);
        let location = checked_optional_text(&mut fields, "location", self.location, LOCATION_MAX);
        let max_participants = checked_capacity(&mut fields, self.max_participants);

        match (title, description, date, fields.is_empty()) {
            (Some(title), Some(description), Some(date), true) => Ok(NewEvent {
                title,
                description,
                date,
                image,
                location,
                max_participants: max_participants.unwrap_or(DEFAULT_MAX_PARTICIPANTS),
                is_active: self.is_active.unwrap_or(true),
            }),
            _ => Err(AppError::fields("Invalid event payload", fields)),
        }
    }

    /// Partial-update validation: only supplied fields are checked.
    pub fn validate_update(self) -> Result<EventChanges, AppError> {
        let mut fields = Map::new();

        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                blank(&mut fields, "title");
            } else if title.len() > TITLE_MAX {
                too_long(&mut fields, "title", TITLE_MAX);
            }
        }
        if let Some(description) = &self.description {
            if description.trim().is_empty() {
                blank(&mut fields, "description");
            }
        }
        let image = checked_optional_text(&mut fields, "image", self.image, IMAGE_MAX);
        let location = checked_optional_text(&mut fields, "location", self.location, LOCATION_MAX);
        let max_participants = checked_capacity(&mut fields, self.max_participants);

        if !fields.is_empty() {
            return Err(AppError::fields("Invalid event payload", fields));
        }

        Ok(EventChanges {
            title: self.title,
            description: self.description,
            date: self.date,
            image,
            location,
            max_participants,
            is_active: self.is_active,
        })
    }
}

fn checked_required_text(
    fields: &mut Map<String, Value>,
    name: &str,
    value: Option<String>,
    max: Option<usize>,
) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => match max {
            Some(max) if v.len() > max => {
                too_long(fields, name, max);
                None
            }
            _ => Some(v),
        },
        Some(_) => {
            blank(fields, name);
            None
        }
        None => {
            required(fields, name);
            None
        }
    }
}

fn checked_optional_text(
    fields: &mut Map<String, Value>,
    name: &str,
    value: Option<String>,
    max: usize,
) -> Option<String> {
    if let Some(v) = &value {
        if v.len() > max {
            too_long(fields, name, max);
        }
    }
    value
}

fn checked_capacity(fields: &mut Map<String, Value>, value: Option<i32>) -> Option<i32> {
    if let Some(n) = value {
        if n < 0 {
            fields.insert(
                "max_participants".to_string(),
                json!("Ensure this value is greater than or equal to 0."),
            );
        }
    }
    value
}

pub async fn list(State(state): State<AppState>) -> Result<Response, AppError> {
    let events = events::list_active(&state.db).await?;
    Ok(success(events, "Events retrieved").into_response())
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = events::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    Ok(success(event, "Event retrieved").into_response())
}

pub async fn create(
    State(state): State<AppState>,
    account: CurrentAccount,
    Json(payload): Json<EventPayload>,
) -> Result<Response, AppError> {
    let new_event = payload.validate_create()?;
    let event = events::create(&state.db, &new_event, account.id).await?;

    Ok(created(event, "Event created").into_response())
}

pub async fn update(
    State(state): State<AppState>,
    _account: CurrentAccount,
    Path(id): Path<Uuid>,
    Json(payload): Json<EventPayload>,
) -> Result<Response, AppError> {
    let changes = payload.validate_update()?;
    let event = events::update(&state.db, id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    Ok(success(event, "Event updated").into_response())
}

pub async fn destroy(
    State(state): State<AppState>,
    _account: CurrentAccount,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    if !events::delete(&state.db, id).await? {
        return Err(AppError::NotFound("Event not found".to_string()));
    }

    Ok(empty_success("Event deleted").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_payload() -> EventPayload {
        EventPayload {
            title: Some("Rust Meetup".to_string()),
            description: Some("Monthly meetup".to_string()),
            date: NaiveDate::from_ymd_opt(2026, 9, 1),
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
    fn test_create_applies_defaults() {
        let event = valid_payload().validate_create().unwrap();
        assert_eq!(event.max_participants, 100);
        assert!(event.is_active);
        assert!(event.image.is_none());
    }

    #[test]
    fn test_create_collects_all_missing_fields() {
        let err = EventPayload::default().validate_create().unwrap_err();
        let fields = field_errors(err);

        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("description"));
        assert!(fields.contains_key("date"));
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn test_create_rejects_blank_title() {
        let payload = EventPayload {
            title: Some("   ".to_string()),
            ..valid_payload()
        };
        let fields = field_errors(payload.validate_create().unwrap_err());
        assert_eq!(fields["title"], "This field may not be blank.");
    }

    #[test]
    fn test_create_rejects_overlong_title() {
        let payload = EventPayload {
            title: Some("x".repeat(201)),
            ..valid_payload()
        };
        let fields = field_errors(payload.validate_create().unwrap_err());
        assert!(fields.contains_key("title"));
    }

    #[test]
    fn test_create_rejects_negative_capacity() {
        let payload = EventPayload {
            max_participants: Some(-1),
            ..valid_payload()
        };
        let fields = field_errors(payload.validate_create().unwrap_err());
        assert!(fields.contains_key("max_participants"));
    }

    #[test]
    fn test_create_accepts_zero_capacity() {
        let payload = EventPayload {
            max_participants: Some(0),
            ..valid_payload()
        };
        assert_eq!(payload.validate_create().unwrap().max_participants, 0);
    }

    #[test]
    fn test_update_allows_sparse_payload() {
        let changes = EventPayload {
            is_active: Some(false),
            ..Default::default()
        }
        .validate_update()
        .unwrap();

        assert_eq!(changes.is_active, Some(false));
        assert!(changes.title.is_none());
    }

    #[test]
    fn test_update_rejects_blank_title() {
        let err = EventPayload {
            title: Some("".to_string()),
            ..Default::default()
        }
        .validate_update()
        .unwrap_err();

        assert!(field_errors(err).contains_key("title"));
    }
}
