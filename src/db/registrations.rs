use sqlx::PgPool;
use uuid::Uuid;

use crate::db::is_unique_violation;
use crate::models::{Event, NewRegistration, Registration, RegistrationChanges, RegistrationResponse};
use crate::utils::error::AppError;

const EVENT_EMAIL_UNIQUE: &str = "registrations_event_email_unique";

const SELECT_WITH_EVENT: &str = r#"
    SELECT r.id, r.event_id, e.title AS event_title, r.name, r.email,
           r.phone, r.registration_date, r.is_confirmed
    FROM registrations r
    JOIN events e ON e.id = r.event_id
"#;

pub async fn list(pool: &PgPool) -> Result<Vec<RegistrationResponse>, AppError> {
    let registrations = sqlx::query_as::<_, RegistrationResponse>(&format!(
        "{SELECT_WITH_EVENT} ORDER BY r.registration_date DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(registrations)
}

pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<RegistrationResponse>, AppError> {
    let registrations = sqlx::query_as::<_, RegistrationResponse>(&format!(
        "{SELECT_WITH_EVENT} ORDER BY r.registration_date DESC LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(registrations)
}

pub async fn list_for_event(
    pool: &PgPool,
    event_id: Uuid,
) -> Result<Vec<RegistrationResponse>, AppError> {
    let registrations = sqlx::query_as::<_, RegistrationResponse>(&format!(
        "{SELECT_WITH_EVENT} WHERE r.event_id = $1 ORDER BY r.registration_date DESC"
    ))
    .bind(event_id)
    .fetch_all(pool)
    .await?;

    Ok(registrations)
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<RegistrationResponse>, AppError> {
    let registration = sqlx::query_as::<_, RegistrationResponse>(&format!(
        "{SELECT_WITH_EVENT} WHERE r.id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(registration)
}

/// Create a registration, enforcing the business rules in order: the event
/// must exist, must have a free seat, and must not already hold this email.
///
/// The event row is locked for the duration of the transaction so two
/// concurrent registrations cannot both pass the capacity check; the unique
/// index on (event_id, email) backstops the duplicate check.
#[tracing::instrument(skip_all, fields(event_id = %registration.event_id, email = %registration.email), err)]
pub async fn create(
    pool: &PgPool,
    registration: &NewRegistration,
) -> Result<RegistrationResponse, AppError> {
    let mut tx = pool.begin().await?;

    let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1 FOR UPDATE")
        .bind(registration.event_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    let confirmed: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM registrations WHERE event_id = $1")
            .bind(event.id)
            .fetch_one(&mut *tx)
            .await?;

    if confirmed >= i64::from(event.max_participants) {
        return Err(AppError::validation(
            "This event is full. Registration closed.",
        ));
    }

    let already_registered: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM registrations WHERE event_id = $1 AND email = $2)",
    )
    .bind(event.id)
    .bind(&registration.email)
    .fetch_one(&mut *tx)
    .await?;

    if already_registered {
        return Err(AppError::validation(
            "You are already registered for this event.",
        ));
    }

    let row = sqlx::query_as::<_, Registration>(
        r#"
        INSERT INTO registrations (event_id, name, email, phone)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(event.id)
    .bind(&registration.name)
    .bind(&registration.email)
    .bind(&registration.phone)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if is_unique_violation(&e, EVENT_EMAIL_UNIQUE) {
            AppError::validation("You are already registered for this event.")
        } else {
            AppError::DatabaseError(e)
        }
    })?;

    tx.commit().await?;

    Ok(RegistrationResponse {
        id: row.id,
        event_id: row.event_id,
        event_title: event.title,
        name: row.name,
        email: row.email,
        phone: row.phone,
        registration_date: row.registration_date,
        is_confirmed: row.is_confirmed,
    })
}

#[tracing::instrument(skip_all, fields(registration_id = %id), err)]
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    changes: &RegistrationChanges,
) -> Result<Option<RegistrationResponse>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE registrations SET
            name = COALESCE($2, name),
            email = COALESCE($3, email),
            phone = COALESCE($4, phone),
            is_confirmed = COALESCE($5, is_confirmed)
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&changes.name)
    .bind(&changes.email)
    .bind(&changes.phone)
    .bind(changes.is_confirmed)
    .execute(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e, EVENT_EMAIL_UNIQUE) {
            AppError::validation("You are already registered for this event.")
        } else {
            AppError::DatabaseError(e)
        }
    })?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get(pool, id).await
}

#[tracing::instrument(skip_all, fields(registration_id = %id), err)]
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM registrations WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
