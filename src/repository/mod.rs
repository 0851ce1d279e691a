pub mod allowed_user;
pub mod association;
pub mod card;
pub mod monthly;
pub mod player;
pub mod slug;
pub mod transaction;
pub mod user;

/// Duplicate key on insert.
pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
