use goodslink_core::Capability;
use reqwest::Url;

use super::helpers::{
    absolutize_image, cents_to_price, json_number_field, json_string_field, og, parse_price,
    query_param,
};
use super::{ExtractionInput, Extractor, RawMetadata};
use crate::error::ResolveError;

/// Youzan shop pages, desktop and `m.youzan.com` alike.
#[derive(Debug, Clone, Copy, Default)]
pub struct YouzanExtractor;

impl Extractor for YouzanExtractor {
    fn capability(&self) -> Capability {
        Capability::Youzan
    }

    fn extract(&self, input: &ExtractionInput<'_>) -> Result<RawMetadata, ResolveError> {
        let html = input.html;

        let title = json_string_field(html, "title").or_else(|| og(html, "og:title"));

        let image_path = og(html, "og:image")
            .or_else(|| first_picture_url(html))
            .and_then(|raw| absolutize_image(&raw));

        let price = json_string_field(html, "price")
            .and_then(|p| parse_price(&p))
            .or_else(|| json_number_field(html, "minPrice").map(cents_to_price));

        let platform_id =
            input.lookup_urls(|url| query_param(url, "alias").or_else(|| last_path_segment(url)));

        Ok(RawMetadata {
            title,
            image_path,
            price,
            platform_id,
        })
    }
}

/// `url` of the first entry in the `"picture": [{...}]` array.
fn first_picture_url(html: &str) -> Option<String> {
    let start = html.find("\"picture\"")?;
    json_string_field(&html[start..], "url")
}

fn last_path_segment(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    url.path_segments()?
        .rfind(|segment| !segment.is_empty())
        .map(str::to_string)
}
