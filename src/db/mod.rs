//! Data access layer: one module per table, holding every SQL statement.

pub mod accounts;
pub mod dashboard;
pub mod events;
pub mod gallery;
pub mod registrations;

/// True when `err` is a violation of the named unique constraint.
pub(crate) fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.constraint() == Some(constraint))
}
