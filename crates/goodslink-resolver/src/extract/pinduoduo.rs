use goodslink_core::Capability;

use super::helpers::{
    absolutize_image, cents_to_price, json_number_field, json_string_field, query_param,
};
use super::{ExtractionInput, Extractor, RawMetadata};
use crate::error::ResolveError;

/// `mobile.yangkeduo.com/goods.html?goods_id=...` pages. Prices in the
/// embedded store are integer cents.
#[derive(Debug, Clone, Copy, Default)]
pub struct PinduoduoExtractor;

impl Extractor for PinduoduoExtractor {
    fn capability(&self) -> Capability {
        Capability::Pinduoduo
    }

    fn extract(&self, input: &ExtractionInput<'_>) -> Result<RawMetadata, ResolveError> {
        let html = input.html;

        let title = json_string_field(html, "goodsName");

        let image_path = json_string_field(html, "hdThumbUrl")
            .or_else(|| json_string_field(html, "thumbUrl"))
            .and_then(|raw| absolutize_image(&raw));

        let price = json_number_field(html, "minGroupPrice").map(cents_to_price);

        let platform_id = input.lookup_urls(|url| query_param(url, "goods_id"));

        Ok(RawMetadata {
            title,
            image_path,
            price,
            platform_id,
        })
    }
}
