use sqlx::PgPool;
use uuid::Uuid;

use crate::db::events;
use crate::models::{GalleryChanges, GalleryResponse, NewGalleryImage};
use crate::utils::error::AppError;

const SELECT_WITH_NAMES: &str = r#"
    SELECT g.id, g.title, g.description, g.image, g.event_id,
           e.title AS event_title, a.username AS created_by_name,
           g.created_at, g.is_featured
    FROM gallery_images g
    LEFT JOIN events e ON e.id = g.event_id
    LEFT JOIN accounts a ON a.id = g.created_by
"#;

pub async fn list(pool: &PgPool) -> Result<Vec<GalleryResponse>, AppError> {
    let images = sqlx::query_as::<_, GalleryResponse>(&format!(
        "{SELECT_WITH_NAMES} ORDER BY g.created_at DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(images)
}

pub async fn list_featured(pool: &PgPool) -> Result<Vec<GalleryResponse>, AppError> {
    let images = sqlx::query_as::<_, GalleryResponse>(&format!(
        "{SELECT_WITH_NAMES} WHERE g.is_featured ORDER BY g.created_at DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(images)
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<GalleryResponse>, AppError> {
    let image =
        sqlx::query_as::<_, GalleryResponse>(&format!("{SELECT_WITH_NAMES} WHERE g.id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await?;

    Ok(image)
}

#[tracing::instrument(skip_all, fields(title = %image.title), err)]
pub async fn create(
    pool: &PgPool,
    image: &NewGalleryImage,
    created_by: Uuid,
) -> Result<GalleryResponse, AppError> {
    if let Some(event_id) = image.event_id {
        if !events::exists(pool, event_id).await? {
            return Err(AppError::NotFound("Event not found".to_string()));
        }
    }

    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO gallery_images (title, description, image, event_id, created_by, is_featured)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(&image.title)
    .bind(&image.description)
    .bind(&image.image)
    .bind(image.event_id)
    .bind(created_by)
    .bind(image.is_featured)
    .fetch_one(pool)
    .await?;

    get(pool, id)
        .await?
        .ok_or_else(|| AppError::InternalServerError("Created gallery image vanished".to_string()))
}

#[tracing::instrument(skip_all, fields(image_id = %id), err)]
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    changes: &GalleryChanges,
) -> Result<Option<GalleryResponse>, AppError> {
    if let Some(event_id) = changes.event_id {
        if !events::exists(pool, event_id).await? {
            return Err(AppError::NotFound("Event not found".to_string()));
        }
    }

    let result = sqlx::query(
        r#"
        UPDATE gallery_images SET
            title = COALESCE($2, title),
            description = COALESCE($3, description),
            image = COALESCE($4, image),
            event_id = COALESCE($5, event_id),
            is_featured = COALESCE($6, is_featured)
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&changes.title)
    .bind(&changes.description)
    .bind(&changes.image)
    .bind(changes.event_id)
    .bind(changes.is_featured)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get(pool, id).await
}

#[tracing::instrument(skip_all, fields(image_id = %id), err)]
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM gallery_images WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
