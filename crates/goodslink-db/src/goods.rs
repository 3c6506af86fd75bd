//! Database operations for `post_goods`.

use chrono::{DateTime, Utc};
use goodslink_core::{GoodsStore, NewProductRecord, ProductRecord};
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `post_goods` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GoodsRow {
    pub id: i64,
    pub user_id: i64,
    /// `0` while the record is a draft.
    pub post_id: i64,
    pub platform_id: String,
    pub title: String,
    pub image_path: String,
    pub price: Decimal,
    /// Platform key; selected as `"type" AS goods_type`.
    pub goods_type: i16,
    pub status: i16,
    pub ready_content: String,
    pub detail_content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GoodsRow> for ProductRecord {
    fn from(row: GoodsRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.user_id,
            thread_id: row.post_id,
            platform_id: row.platform_id,
            title: row.title,
            image_path: row.image_path,
            price: row.price,
            goods_type: row.goods_type,
            status: row.status,
            ready_content: row.ready_content,
            detail_content: row.detail_content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const GOODS_COLUMNS: &str = "id, user_id, post_id, platform_id, title, image_path, price, \
     \"type\" AS goods_type, status, ready_content, detail_content, created_at, updated_at";

/// SHA-256 hex of `ready_content`, stored in `ready_content_hash` so the
/// content lookup hits an index instead of comparing long text columns.
#[must_use]
pub fn content_key(ready_content: &str) -> String {
    format!("{:x}", Sha256::digest(ready_content.as_bytes()))
}

// ---------------------------------------------------------------------------
// post_goods operations
// ---------------------------------------------------------------------------

/// Newest draft (`post_id = 0`) owned by `user_id` whose `ready_content`
/// matches exactly.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_draft_by_content(
    pool: &PgPool,
    user_id: i64,
    ready_content: &str,
) -> Result<Option<GoodsRow>, DbError> {
    let sql = format!(
        "SELECT {GOODS_COLUMNS} FROM post_goods \
         WHERE user_id = $1 AND post_id = 0 AND ready_content_hash = $2 AND ready_content = $3 \
         ORDER BY id DESC LIMIT 1"
    );
    let row = sqlx::query_as::<_, GoodsRow>(&sql)
        .bind(user_id)
        .bind(content_key(ready_content))
        .bind(ready_content)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Newest draft owned by `user_id` with exactly this `title`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_draft_by_title(
    pool: &PgPool,
    user_id: i64,
    title: &str,
) -> Result<Option<GoodsRow>, DbError> {
    let sql = format!(
        "SELECT {GOODS_COLUMNS} FROM post_goods \
         WHERE user_id = $1 AND post_id = 0 AND title = $2 \
         ORDER BY id DESC LIMIT 1"
    );
    let row = sqlx::query_as::<_, GoodsRow>(&sql)
        .bind(user_id)
        .bind(title)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Fetches one row by primary key.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has this `id`, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_goods(pool: &PgPool, id: i64) -> Result<GoodsRow, DbError> {
    let sql = format!("SELECT {GOODS_COLUMNS} FROM post_goods WHERE id = $1");
    sqlx::query_as::<_, GoodsRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound)
}

/// Inserts a record and returns the stored row. Rows are never updated here.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_goods(pool: &PgPool, record: &NewProductRecord) -> Result<GoodsRow, DbError> {
    let sql = format!(
        "INSERT INTO post_goods \
           (user_id, post_id, platform_id, title, image_path, price, \"type\", status, \
            ready_content, ready_content_hash, detail_content) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING {GOODS_COLUMNS}"
    );
    let row = sqlx::query_as::<_, GoodsRow>(&sql)
        .bind(record.owner_id)
        .bind(record.thread_id)
        .bind(&record.platform_id)
        .bind(&record.title)
        .bind(&record.image_path)
        .bind(record.price)
        .bind(record.goods_type)
        .bind(record.status)
        .bind(&record.ready_content)
        .bind(content_key(&record.ready_content))
        .bind(&record.detail_content)
        .fetch_one(pool)
        .await?;
    Ok(row)
}

// ---------------------------------------------------------------------------
// GoodsStore adapter
// ---------------------------------------------------------------------------

/// [`GoodsStore`] backed by a Postgres pool.
#[derive(Debug, Clone)]
pub struct PgGoodsStore {
    pool: PgPool,
}

impl PgGoodsStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl GoodsStore for PgGoodsStore {
    type Error = DbError;

    async fn find_draft_by_content(
        &self,
        owner_id: i64,
        ready_content: &str,
    ) -> Result<Option<ProductRecord>, DbError> {
        Ok(find_draft_by_content(&self.pool, owner_id, ready_content)
            .await?
            .map(ProductRecord::from))
    }

    async fn find_draft_by_title(
        &self,
        owner_id: i64,
        title: &str,
    ) -> Result<Option<ProductRecord>, DbError> {
        Ok(find_draft_by_title(&self.pool, owner_id, title)
            .await?
            .map(ProductRecord::from))
    }

    async fn insert(&self, record: NewProductRecord) -> Result<ProductRecord, DbError> {
        insert_goods(&self.pool, &record).await.map(ProductRecord::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_key_is_sha256_hex() {
        assert_eq!(
            content_key(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(content_key("abc").len(), 64);
        assert_ne!(content_key("abc"), content_key("abd"));
    }
}
