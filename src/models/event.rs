use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub image: Option<String>,
    pub location: Option<String>,
    pub max_participants: i32,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Read-side projection: the row plus its derived fields
/// (`registration_count`, `is_full`, creator username).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EventResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub image: Option<String>,
    pub location: Option<String>,
    pub max_participants: i32,
    pub is_active: bool,
    pub registration_count: i64,
    pub is_full: bool,
    pub created_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated create request, ready to insert.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub image: Option<String>,
    pub location: Option<String>,
    pub max_participants: i32,
    pub is_active: bool,
}

/// A validated partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub image: Option<String>,
    pub location: Option<String>,
    pub max_participants: Option<i32>,
    pub is_active: Option<bool>,
}
