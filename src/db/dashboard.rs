use serde::Serialize;
use sqlx::PgPool;

use crate::db::{events, registrations};
use crate::models::{EventResponse, RegistrationResponse};
use crate::utils::error::AppError;

const RECENT_EVENTS: i64 = 5;
const RECENT_REGISTRATIONS: i64 = 10;

/// Literal table cardinalities plus the most recent records, no pagination.
#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub total_events: i64,
    pub active_events: i64,
    pub total_registrations: i64,
    pub total_gallery_images: i64,
    pub recent_events: Vec<EventResponse>,
    pub recent_registrations: Vec<RegistrationResponse>,
}

pub async fn summary(pool: &PgPool) -> Result<DashboardSummary, AppError> {
    let total_events: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
        .fetch_one(pool)
        .await?;

    let active_events: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events WHERE is_active")
        .fetch_one(pool)
        .await?;

    let total_registrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM registrations")
        .fetch_one(pool)
        .await?;

    let total_gallery_images: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM gallery_images")
        .fetch_one(pool)
        .await?;

    let recent_events = events::recent(pool, RECENT_EVENTS).await?;
    let recent_registrations = registrations::recent(pool, RECENT_REGISTRATIONS).await?;

    Ok(DashboardSummary {
        total_events,
        active_events,
        total_registrations,
        total_gallery_images,
        recent_events,
        recent_registrations,
    })
}
