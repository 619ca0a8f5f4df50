use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::auth::CurrentAccount;
use crate::db::gallery;
use crate::handlers::{blank, required, too_long};
use crate::models::{GalleryChanges, NewGalleryImage};
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};
use crate::AppState;

const TITLE_MAX: usize = 200;
const IMAGE_MAX: usize = 500;

#[derive(Debug, Default, Deserialize)]
pub struct GalleryPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub event: Option<Uuid>,
    pub is_featured: Option<bool>,
}

impl GalleryPayload {
    pub fn validate_create(self) -> Result<NewGalleryImage, AppError> {
        let mut fields = Map::new();

        let title = match self.title {
            Some(t) if t.trim().is_empty() => {
                blank(&mut fields, "title");
                None
            }
            Some(t) if t.len() > TITLE_MAX => {
                too_long(&mut fields, "title", TITLE_MAX);
                None
            }
            Some(t) => Some(t),
            None => {
                required(&mut fields, "title");
                None
            }
        };

        let image = match self.image {
            Some(i) if i.trim().is_empty() => {
                blank(&mut fields, "image");
                None
            }
            Some(i) if i.len() > IMAGE_MAX => {
                too_long(&mut fields, "image", IMAGE_MAX);
                None
            }
            Some(i) => Some(i),
            None => {
                required(&mut fields, "image");
                None
            }
        };

        match (title, image, fields.is_empty()) {
            (Some(title), Some(image), true) => Ok(NewGalleryImage {
                title,
                description: self.description,
                image,
                event_id: self.event,
                is_featured: self.is_featured.unwrap_or(false),
            }),
            _ => Err(AppError::fields("Invalid gallery payload", fields)),
        }
    }

    pub fn validate_update(self) -> Result<GalleryChanges, AppError> {
        let mut fields = Map::new();

        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                blank(&mut fields, "title");
            } else if title.len() > TITLE_MAX {
                too_long(&mut fields, "title", TITLE_MAX);
            }
        }
        if let Some(image) = &self.image {
            if image.trim().is_empty() {
                blank(&mut fields, "image");
            } else if image.len() > IMAGE_MAX {
                too_long(&mut fields, "image", IMAGE_MAX);
            }
        }

        if !fields.is_empty() {
            return Err(AppError::fields("Invalid gallery payload", fields));
        }

        Ok(GalleryChanges {
            title: self.title,
            description: self.description,
            image: self.image,
            event_id: self.event,
            is_featured: self.is_featured,
        })
    }
}

pub async fn list(State(state): State<AppState>) -> Result<Response, AppError> {
    let images = gallery::list(&state.db).await?;
    Ok(success(images, "Gallery retrieved").into_response())
}

pub async fn featured(State(state): State<AppState>) -> Result<Response, AppError> {
    let images = gallery::list_featured(&state.db).await?;
    Ok(success(images, "Featured gallery retrieved").into_response())
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let image = gallery::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Gallery image not found".to_string()))?;

    Ok(success(image, "Gallery image retrieved").into_response())
}

pub async fn create(
    State(state): State<AppState>,
    account: CurrentAccount,
    Json(payload): Json<GalleryPayload>,
) -> Result<Response, AppError> {
    let new_image = payload.validate_create()?;
    let image = gallery::create(&state.db, &new_image, account.id).await?;

    Ok(created(image, "Gallery image created").into_response())
}

pub async fn update(
    State(state): State<AppState>,
    _account: CurrentAccount,
    Path(id): Path<Uuid>,
    Json(payload): Json<GalleryPayload>,
) -> Result<Response, AppError> {
    let changes = payload.validate_update()?;
    let image = gallery::update(&state.db, id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound("Gallery image not found".to_string()))?;

    Ok(success(image, "Gallery image updated").into_response())
}

pub async fn destroy(
    State(state): State<AppState>,
    _account: CurrentAccount,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    if !gallery::delete(&state.db, id).await? {
        return Err(AppError::NotFound("Gallery image not found".to_string()));
    }

    Ok(empty_success("Gallery image deleted").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_create_requires_title_and_image() {
        let fields = field_errors(GalleryPayload::default().validate_create().unwrap_err());
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("image"));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_create_with_optional_event() {
        let image = GalleryPayload {
            title: Some("Opening night".to_string()),
            image: Some("https://cdn.example.com/photo.jpg".to_string()),
            event: Some(Uuid::new_v4()),
            ..Default::default()
        }
        .validate_create()
        .unwrap();

        assert!(image.event_id.is_some());
        assert!(!image.is_featured);
    }

    #[test]
    fn test_create_rejects_overlong_url() {
        let err = GalleryPayload {
            title: Some("ok".to_string()),
            image: Some(format!("https://{}/x.jpg", "a".repeat(500))),
            ..Default::default()
        }
        .validate_create()
        .unwrap_err();

        assert!(field_errors(err).contains_key("image"));
    }

    #[test]
    fn test_update_allows_featured_toggle_alone() {
        let changes = GalleryPayload {
            is_featured: Some(true),
            ..Default::default()
        }
        .validate_update()
        .unwrap();

        assert_eq!(changes.is_featured, Some(true));
        assert!(changes.title.is_none());
    }
}
