use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GalleryImage {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image: String,
    #[serde(rename = "event")]
    pub event_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub is_featured: bool,
}

/// Gallery image joined with event title and creator username.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct GalleryResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image: String,
    #[serde(rename = "event")]
    pub event_id: Option<Uuid>,
    pub event_title: Option<String>,
    pub created_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_featured: bool,
}

#[derive(Debug, Clone)]
pub struct NewGalleryImage {
    pub title: String,
    pub description: Option<String>,
    pub image: String,
    pub event_id: Option<Uuid>,
    pub is_featured: bool,
}

#[derive(Debug, Clone, Default)]
pub struct GalleryChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub event_id: Option<Uuid>,
    pub is_featured: Option<bool>,
}
