use axum::{extract::State, response::IntoResponse, Extension, Json};
use chrono::{DateTime, Utc};
use goodslink_core::{Actor, PlatformKind, ProductRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{map_resolve_error, ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct AnalysisRequest {
    /// Free text pasted by the user; must contain one storefront link.
    pub address: String,
}

#[derive(Debug, Serialize)]
pub(super) struct GoodsItem {
    pub id: i64,
    pub user_id: i64,
    pub post_id: i64,
    pub platform_id: String,
    pub title: String,
    pub image_path: String,
    pub price: Decimal,
    #[serde(rename = "type")]
    pub goods_type: i16,
    pub platform: Option<&'static str>,
    pub status: i16,
    pub ready_content: String,
    pub detail_content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRecord> for GoodsItem {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.owner_id,
            post_id: record.thread_id,
            platform_id: record.platform_id,
            title: record.title,
            image_path: record.image_path,
            price: record.price,
            goods_type: record.goods_type,
            platform: PlatformKind::from_key(record.goods_type).map(PlatformKind::as_str),
            status: record.status,
            ready_content: record.ready_content,
            detail_content: record.detail_content,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

pub(super) async fn analyze_goods(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(actor): Extension<Actor>,
    Json(body): Json<AnalysisRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .resolver
        .resolve(&actor, &body.address)
        .await
        .map_err(|e| map_resolve_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: GoodsItem::from(record),
        meta: ResponseMeta::new(req_id.0),
    }))
}
