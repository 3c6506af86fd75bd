use std::sync::LazyLock;

use goodslink_core::Capability;
use regex::Regex;

use super::helpers::{
    absolutize_image, clean_text, element_text, extract_attr, find_tag, json_number_field,
    json_string_field, non_empty, og, query_param, strip_title_suffixes, title_tag,
};
use super::{ExtractionInput, Extractor, RawMetadata};
use crate::error::ResolveError;

static ITEM_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(\d+)\.html").expect("valid jd item regex"));
static PRODUCT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/product/(\d+)\.html").expect("valid jd product regex"));
static TITLE_NOISE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"【[^】]*】").expect("valid jd title regex"));

const TITLE_SUFFIXES: [&str; 2] = ["-京东", "- 京东"];

fn capture_id(re: &Regex, url: &str) -> Option<String> {
    re.captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// `<title>` with `【行情 报价 价格 评测】`-style blocks and the `-京东` suffix removed.
fn cleaned_title(html: &str) -> Option<String> {
    let title = title_tag(html)?;
    let title = TITLE_NOISE_RE.replace_all(&title, " ");
    non_empty(strip_title_suffixes(&clean_text(&title), &TITLE_SUFFIXES))
}

/// Desktop `item.jd.com/<sku>.html` pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct JdExtractor;

impl Extractor for JdExtractor {
    fn capability(&self) -> Capability {
        Capability::Jd
    }

    fn extract(&self, input: &ExtractionInput<'_>) -> Result<RawMetadata, ResolveError> {
        let html = input.html;

        let title = element_text(html, "div", "class", "sku-name").or_else(|| cleaned_title(html));

        let image_path = find_tag(html, "img", "id", "spec-img")
            .and_then(|tag| extract_attr(tag, "data-origin").or_else(|| extract_attr(tag, "src")))
            .and_then(|raw| absolutize_image(&raw));

        let price = json_number_field(html, "p").or_else(|| json_number_field(html, "price"));

        let platform_id = input.lookup_urls(|url| capture_id(&ITEM_ID_RE, url));

        Ok(RawMetadata {
            title,
            image_path,
            price,
            platform_id,
        })
    }
}

/// Mobile `item.m.jd.com/product/<sku>.html` pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct JdH5Extractor;

impl Extractor for JdH5Extractor {
    fn capability(&self) -> Capability {
        Capability::JdH5
    }

    fn extract(&self, input: &ExtractionInput<'_>) -> Result<RawMetadata, ResolveError> {
        let html = input.html;

        let title = json_string_field(html, "skuName").or_else(|| cleaned_title(html));

        let image_path = og(html, "og:image")
            .or_else(|| json_string_field(html, "imageurl"))
            .and_then(|raw| absolutize_image(&raw));

        let price = json_number_field(html, "jdPrice");

        let platform_id = input.lookup_urls(|url| {
            capture_id(&PRODUCT_ID_RE, url).or_else(|| query_param(url, "sku"))
        });

        Ok(RawMetadata {
            title,
            image_path,
            price,
            platform_id,
        })
    }
}
