use goodslink_core::Capability;

use super::helpers::{
    absolutize_image, extract_attr, find_tag, json_string_field, og, parse_price, query_param,
    strip_title_suffixes, title_tag,
};
use super::{ExtractionInput, Extractor, RawMetadata};
use crate::error::ResolveError;

const TITLE_SUFFIXES: [&str; 2] = ["-tmall.com天猫", "-天猫Tmall.com"];

/// `detail.tmall.com` item pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct TmallExtractor;

impl Extractor for TmallExtractor {
    fn capability(&self) -> Capability {
        Capability::Tmall
    }

    fn extract(&self, input: &ExtractionInput<'_>) -> Result<RawMetadata, ResolveError> {
        let html = input.html;

        let title = title_tag(html)
            .map(|t| strip_title_suffixes(&t, &TITLE_SUFFIXES))
            .filter(|t| !t.is_empty())
            .or_else(|| og(html, "og:title"));

        let image_path = find_tag(html, "img", "id", "J_ImgBooth")
            .and_then(|tag| extract_attr(tag, "src"))
            .or_else(|| og(html, "og:image"))
            .and_then(|raw| absolutize_image(&raw));

        let price = json_string_field(html, "defaultItemPrice")
            .or_else(|| json_string_field(html, "price"))
            .and_then(|p| parse_price(&p));

        let platform_id = input.lookup_urls(|url| query_param(url, "id"));

        Ok(RawMetadata {
            title,
            image_path,
            price,
            platform_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn extracts_item_page() {
        let html = r#"<html><head><title>雅诗兰黛小棕瓶精华 50ml-tmall.com天猫</title></head>
            <body><img id="J_ImgBooth" alt="" src="//img.alicdn.com/bao/main.jpg_430x430.jpg">
            <script>TShop.Setup({"defaultItemPrice":"650.00 - 900.00","price":"1.00"});</script>
            </body></html>"#;
        let input = ExtractionInput {
            html,
            address: "https://detail.tmall.com/item.htm?id=520813250866&skuId=1",
            final_url: "https://detail.tmall.com/item.htm?id=520813250866&skuId=1",
            ready_content: "https://detail.tmall.com/item.htm?id=520813250866&skuId=1",
        };
        let meta = TmallExtractor.extract(&input).unwrap();
        assert_eq!(meta.title.as_deref(), Some("雅诗兰黛小棕瓶精华 50ml"));
        assert_eq!(
            meta.image_path.as_deref(),
            Some("https://img.alicdn.com/bao/main.jpg_430x430.jpg")
        );
        assert_eq!(meta.price, Some(Decimal::new(650, 0)));
        assert_eq!(meta.platform_id.as_deref(), Some("520813250866"));
    }

    #[test]
    fn id_falls_back_to_final_url() {
        let input = ExtractionInput {
            html: "<title>x</title>",
            address: "https://s.click.tmall.com/abc",
            final_url: "https://detail.tmall.com/item.htm?id=42",
            ready_content: "",
        };
        let meta = TmallExtractor.extract(&input).unwrap();
        assert_eq!(meta.platform_id.as_deref(), Some("42"));
        assert_eq!(meta.image_path, None);
        assert_eq!(meta.price, None);
    }
}
