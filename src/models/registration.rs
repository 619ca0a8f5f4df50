use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Registration {
    pub id: Uuid,
    #[serde(rename = "event")]
    pub event_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub registration_date: DateTime<Utc>,
    pub is_confirmed: bool,
}

/// Registration joined with its parent event's title.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RegistrationResponse {
    pub id: Uuid,
    #[serde(rename = "event")]
    pub event_id: Uuid,
    pub event_title: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub registration_date: DateTime<Utc>,
    pub is_confirmed: bool,
}

#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub event_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_confirmed: Option<bool>,
}
