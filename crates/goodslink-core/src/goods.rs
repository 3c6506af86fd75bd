//! Product records and the collaborator boundaries the resolver depends on.

use std::future::Future;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// `thread_id` of a record not yet attached to a published thread.
pub const DRAFT_THREAD_ID: i64 = 0;

/// `status` of a freshly resolved record.
pub const STATUS_DRAFT: i16 = 0;

/// A persisted goods record (`post_goods` row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: i64,
    pub owner_id: i64,
    /// `0` while the record is a draft.
    pub thread_id: i64,
    /// Item id on the storefront, empty when the page did not expose one.
    pub platform_id: String,
    pub title: String,
    pub image_path: String,
    pub price: Decimal,
    /// Platform key of the storefront the link resolved to.
    pub goods_type: i16,
    pub status: i16,
    /// Sanitized text the user pasted.
    pub ready_content: String,
    /// The link extracted from `ready_content`.
    pub detail_content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductRecord {
    #[must_use]
    pub fn is_draft(&self) -> bool {
        self.thread_id == DRAFT_THREAD_ID
    }
}

/// Values for a single `post_goods` insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProductRecord {
    pub owner_id: i64,
    pub thread_id: i64,
    pub platform_id: String,
    pub title: String,
    pub image_path: String,
    pub price: Decimal,
    pub goods_type: i16,
    pub status: i16,
    pub ready_content: String,
    pub detail_content: String,
}

/// The user on whose behalf a link is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: i64,
}

impl Actor {
    #[must_use]
    pub fn guest() -> Self {
        Self { id: 0 }
    }

    #[must_use]
    pub fn is_guest(&self) -> bool {
        self.id <= 0
    }
}

/// Content types an actor may be permitted to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Goods,
}

impl ContentType {
    /// Permission name checked by the authorization collaborator.
    #[must_use]
    pub fn create_permission(self) -> &'static str {
        match self {
            ContentType::Goods => "createThread.goods",
        }
    }
}

/// Persistence boundary for product records.
pub trait GoodsStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Finds the owner's draft whose `ready_content` equals `ready_content`.
    fn find_draft_by_content(
        &self,
        owner_id: i64,
        ready_content: &str,
    ) -> impl Future<Output = Result<Option<ProductRecord>, Self::Error>> + Send;

    /// Finds the owner's draft with exactly this title.
    fn find_draft_by_title(
        &self,
        owner_id: i64,
        title: &str,
    ) -> impl Future<Output = Result<Option<ProductRecord>, Self::Error>> + Send;

    fn insert(
        &self,
        record: NewProductRecord,
    ) -> impl Future<Output = Result<ProductRecord, Self::Error>> + Send;
}

/// Authorization boundary: decides whether an actor may create content.
pub trait Authorizer: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn can_create(
        &self,
        actor: &Actor,
        content: ContentType,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guest_actor_is_not_registered() {
        assert!(Actor::guest().is_guest());
        assert!(!Actor { id: 42 }.is_guest());
    }

    #[test]
    fn goods_permission_name() {
        assert_eq!(ContentType::Goods.create_permission(), "createThread.goods");
    }

    #[test]
    fn record_serializes_price_as_string() {
        let record = ProductRecord {
            id: 1,
            owner_id: 2,
            thread_id: 0,
            platform_id: "1".to_string(),
            title: "t".to_string(),
            image_path: "i".to_string(),
            price: Decimal::new(1999, 2),
            goods_type: 0,
            status: 0,
            ready_content: "r".to_string(),
            detail_content: "d".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(record.is_draft());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["price"], "19.99");
    }
}
