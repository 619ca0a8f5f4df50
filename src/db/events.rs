use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{EventChanges, EventResponse, NewEvent};
use crate::utils::error::AppError;

// Shared projection: the row plus registration_count, is_full and the
// creator's username. Filters slot in before GROUP BY.
fn select_events(filter: &str, tail: &str) -> String {
    format!(
        r#"
        SELECT e.id, e.title, e.description, e.date, e.image, e.location,
               e.max_participants, e.is_active,
               COUNT(r.id) AS registration_count,
               (COUNT(r.id) >= e.max_participants) AS is_full,
               a.username AS created_by_name,
               e.created_at, e.updated_at
        FROM events e
        LEFT JOIN registrations r ON r.event_id = e.id
        LEFT JOIN accounts a ON a.id = e.created_by
        {filter}
        GROUP BY e.id, a.username
        {tail}
        "#
    )
}

/// The public listing: active events only, newest date first.
pub async fn list_active(pool: &PgPool) -> Result<Vec<EventResponse>, AppError> {
    let events = sqlx::query_as::<_, EventResponse>(&select_events(
        "WHERE e.is_active",
        "ORDER BY e.date DESC",
    ))
    .fetch_all(pool)
    .await?;

    Ok(events)
}

/// Most recent events across all of them, active or not.
pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<EventResponse>, AppError> {
    let events =
        sqlx::query_as::<_, EventResponse>(&select_events("", "ORDER BY e.date DESC LIMIT $1"))
            .bind(limit)
            .fetch_all(pool)
            .await?;

    Ok(events)
}

/// Lookup by id ignores `is_active`: writes may target inactive events.
pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<EventResponse>, AppError> {
    let event = sqlx::query_as::<_, EventResponse>(&select_events("WHERE e.id = $1", ""))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(event)
}

#[tracing::instrument(skip_all, fields(title = %event.title), err)]
pub async fn create(
    pool: &PgPool,
    event: &NewEvent,
    created_by: Uuid,
) -> Result<EventResponse, AppError> {
    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO events (title, description, date, image, location,
                            max_participants, is_active, created_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id
        "#,
    )
    .bind(&event.title)
    .bind(&event.description)
    .bind(event.date)
    .bind(&event.image)
    .bind(&event.location)
    .bind(event.max_participants)
    .bind(event.is_active)
    .bind(created_by)
    .fetch_one(pool)
    .await?;

    get(pool, id)
        .await?
        .ok_or_else(|| AppError::InternalServerError("Created event vanished".to_string()))
}

#[tracing::instrument(skip_all, fields(event_id = %id), err)]
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    changes: &EventChanges,
) -> Result<Option<EventResponse>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE events SET
            title = COALESCE($2, title),
            description = COALESCE($3, description),
            date = COALESCE($4, date),
            image = COALESCE($5, image),
            location = COALESCE($6, location),
            max_participants = COALESCE($7, max_participants),
            is_active = COALESCE($8, is_active),
            updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&changes.title)
    .bind(&changes.description)
    .bind(changes.date)
    .bind(&changes.image)
    .bind(&changes.location)
    .bind(changes.max_participants)
    .bind(changes.is_active)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get(pool, id).await
}

#[tracing::instrument(skip_all, fields(event_id = %id), err)]
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// True when the event row exists, regardless of `is_active`.
pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM events WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;

    Ok(exists)
}
