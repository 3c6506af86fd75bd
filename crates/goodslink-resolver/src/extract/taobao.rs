use std::sync::LazyLock;

use goodslink_core::Capability;
use regex::Regex;

use super::helpers::{
    absolutize_image, element_text, json_first_array_string, json_string_field, og, parse_price,
    query_param, strip_title_suffixes, title_tag,
};
use super::{bracket_title, ExtractionInput, Extractor, RawMetadata};
use crate::error::ResolveError;

static SHARE_TARGET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"var\s+url\s*=\s*['"]([^'"]+)['"]"#).expect("valid share target regex")
});

const TITLE_SUFFIXES: [&str; 2] = ["-淘宝网", "- 淘宝网"];

/// Desktop `item.taobao.com` pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaobaoExtractor;

impl Extractor for TaobaoExtractor {
    fn capability(&self) -> Capability {
        Capability::Taobao
    }

    fn extract(&self, input: &ExtractionInput<'_>) -> Result<RawMetadata, ResolveError> {
        let html = input.html;

        let title = title_tag(html)
            .map(|t| strip_title_suffixes(&t, &TITLE_SUFFIXES))
            .filter(|t| !t.is_empty())
            .or_else(|| og(html, "og:title"));

        let image_path = json_first_array_string(html, "auctionImages")
            .or_else(|| og(html, "og:image"))
            .and_then(|raw| absolutize_image(&raw));

        let price = element_text(html, "em", "class", "tb-rmb-num")
            .or_else(|| element_text(html, "span", "class", "tb-rmb-num"))
            .and_then(|text| parse_price(&text))
            .or_else(|| json_string_field(html, "price").and_then(|p| parse_price(&p)));

        let platform_id = input.lookup_urls(|url| query_param(url, "id"));

        Ok(RawMetadata {
            title,
            image_path,
            price,
            platform_id,
        })
    }
}

/// Static share landing pages behind `m.tb.cn` short links. The real item
/// link is embedded as `var url = '...'` in an inline script.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaobaoShareExtractor;

impl Extractor for TaobaoShareExtractor {
    fn capability(&self) -> Capability {
        Capability::TaobaoShare
    }

    fn extract(&self, input: &ExtractionInput<'_>) -> Result<RawMetadata, ResolveError> {
        let html = input.html;

        let title = bracket_title(input.ready_content)
            .map(str::to_string)
            .or_else(|| title_tag(html));

        let image_path = og(html, "og:image")
            .or_else(|| json_string_field(html, "pic"))
            .and_then(|raw| absolutize_image(&raw));

        let price = json_string_field(html, "price").and_then(|p| parse_price(&p));

        let platform_id = SHARE_TARGET_RE
            .captures(html)
            .and_then(|caps| caps.get(1))
            .and_then(|target| query_param(target.as_str(), "id"))
            .or_else(|| input.lookup_urls(|url| query_param(url, "id")));

        Ok(RawMetadata {
            title,
            image_path,
            price,
            platform_id,
        })
    }
}
