//! Database operations for `actor_permissions`.

use goodslink_core::{Actor, Authorizer, ContentType};
use sqlx::PgPool;

use crate::DbError;

/// Whether `actor_id` holds `permission`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn has_permission(pool: &PgPool, actor_id: i64, permission: &str) -> Result<bool, DbError> {
    let granted = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM actor_permissions WHERE actor_id = $1 AND permission = $2)",
    )
    .bind(actor_id)
    .bind(permission)
    .fetch_one(pool)
    .await?;
    Ok(granted)
}

/// Grants `permission` to `actor_id`. Granting twice is a no-op.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn grant_permission(pool: &PgPool, actor_id: i64, permission: &str) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO actor_permissions (actor_id, permission) VALUES ($1, $2) \
         ON CONFLICT (actor_id, permission) DO NOTHING",
    )
    .bind(actor_id)
    .bind(permission)
    .execute(pool)
    .await?;
    Ok(())
}

/// Revokes `permission` from `actor_id`. Returns whether a grant existed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn revoke_permission(
    pool: &PgPool,
    actor_id: i64,
    permission: &str,
) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM actor_permissions WHERE actor_id = $1 AND permission = $2")
        .bind(actor_id)
        .bind(permission)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// [`Authorizer`] backed by the `actor_permissions` table.
#[derive(Debug, Clone)]
pub struct PgAuthorizer {
    pool: PgPool,
}

impl PgAuthorizer {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl Authorizer for PgAuthorizer {
    type Error = DbError;

    async fn can_create(&self, actor: &Actor, content: ContentType) -> Result<bool, DbError> {
        has_permission(&self.pool, actor.id, content.create_permission()).await
    }
}
