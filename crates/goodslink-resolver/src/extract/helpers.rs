//! Literal-pattern lookups over storefront HTML and the JSON blobs embedded
//! in it. Every function is best-effort and returns `None` on a miss.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use rust_decimal::Decimal;

static TITLE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid title regex"));
static META_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("valid regex"));
static INNER_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid number regex"));
static OPEN_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<([A-Za-z][A-Za-z0-9]*)\b[^>]*>").expect("valid open tag regex")
});
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)(?:^|\s)([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("valid attribute regex")
});
static JSON_STRING_PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""((?:[^"\\]|\\.)*)"\s*:\s*"((?:[^"\\]|\\.)*)""#)
        .expect("valid json string pair regex")
});
static JSON_NUMBER_PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""((?:[^"\\]|\\.)*)"\s*:\s*"?(-?\d+(?:\.\d+)?)"#)
        .expect("valid json number pair regex")
});
static JSON_ARRAY_HEAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""((?:[^"\\]|\\.)*)"\s*:\s*\[\s*"((?:[^"\\]|\\.)*)""#)
        .expect("valid json array regex")
});

/// Text of the `<title>` element, entity-decoded and whitespace-collapsed.
pub(crate) fn title_tag(html: &str) -> Option<String> {
    let raw = TITLE_TAG_RE.captures(html)?.get(1)?.as_str();
    non_empty(clean_text(&decode_entities(raw)))
}

/// `content` of the first `<meta>` whose `key_attr` equals `key_value`.
pub(crate) fn meta_content(html: &str, key_attr: &str, key_value: &str) -> Option<String> {
    META_TAG_RE.find_iter(html).find_map(|m| {
        let tag = m.as_str();
        let key = extract_attr(tag, key_attr)?;
        if key.eq_ignore_ascii_case(key_value) {
            extract_attr(tag, "content")
                .map(|v| decode_entities(&v))
                .and_then(non_empty)
        } else {
            None
        }
    })
}

/// Open Graph value, accepting both `property=` and `name=` spellings.
pub(crate) fn og(html: &str, property: &str) -> Option<String> {
    meta_content(html, "property", property).or_else(|| meta_content(html, "name", property))
}

/// Value of `attr` in a single tag. The name must stand alone, so `src`
/// does not match `data-src`. Values keep the other quote character.
pub(crate) fn extract_attr(tag: &str, attr: &str) -> Option<String> {
    ATTR_RE
        .captures_iter(tag)
        .find(|c| c[1].eq_ignore_ascii_case(attr))
        .and_then(|c| c.get(2).or_else(|| c.get(3)))
        .map(|m| m.as_str().trim().to_string())
        .and_then(non_empty)
}

/// First opening `<tag_name>` whose `attr` holds `token` (whitespace-separated
/// match, so `class="sku-name big"` matches `sku-name`).
pub(crate) fn find_tag<'a>(
    html: &'a str,
    tag_name: &str,
    attr: &str,
    token: &str,
) -> Option<&'a str> {
    OPEN_TAG_RE
        .captures_iter(html)
        .filter(|c| c[1].eq_ignore_ascii_case(tag_name))
        .filter_map(|c| c.get(0).map(|m| m.as_str()))
        .find(|tag| {
            extract_attr(tag, attr).is_some_and(|value| value.split_whitespace().any(|t| t == token))
        })
}

/// Text content of the first `<tag_name>` element matched by [`find_tag`],
/// with nested markup removed.
pub(crate) fn element_text(html: &str, tag_name: &str, attr: &str, token: &str) -> Option<String> {
    let open = find_tag(html, tag_name, attr, token)?;
    let start = html.find(open)? + open.len();
    let close = format!("</{tag_name}");
    let end = html[start..]
        .to_ascii_lowercase()
        .find(&close)
        .map_or(html.len(), |i| start + i);
    let inner = INNER_TAG_RE.replace_all(&html[start..end], " ");
    non_empty(clean_text(&decode_entities(&inner)))
}

/// String value of the first `"key": "..."` pair, JSON escapes decoded.
pub(crate) fn json_string_field(text: &str, key: &str) -> Option<String> {
    let raw = JSON_STRING_PAIR_RE
        .captures_iter(text)
        .find(|c| &c[1] == key)?
        .get(2)?
        .as_str();
    non_empty(decode_json_string(raw).trim().to_string())
}

/// Numeric value of the first `"key": 123` (or `"key": "123"`) pair.
pub(crate) fn json_number_field(text: &str, key: &str) -> Option<Decimal> {
    let caps = JSON_NUMBER_PAIR_RE.captures_iter(text).find(|c| &c[1] == key)?;
    Decimal::from_str(caps.get(2)?.as_str()).ok()
}

/// First string inside the array value of `"key": [...]`.
pub(crate) fn json_first_array_string(text: &str, key: &str) -> Option<String> {
    let raw = JSON_ARRAY_HEAD_RE
        .captures_iter(text)
        .find(|c| &c[1] == key)?
        .get(2)?
        .as_str();
    non_empty(decode_json_string(raw).trim().to_string())
}

fn decode_json_string(raw: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{raw}\"")).unwrap_or_else(|_| raw.to_string())
}

/// First decimal number in `text`, e.g. `"¥ 59.90 - 79.00"` → `59.90`.
pub(crate) fn parse_price(text: &str) -> Option<Decimal> {
    let raw = NUMBER_RE.find(text)?.as_str();
    Decimal::from_str(raw).ok()
}

pub(crate) fn cents_to_price(cents: Decimal) -> Decimal {
    cents / Decimal::ONE_HUNDRED
}

/// Completes protocol-relative URLs with `https:` and undoes `\/` escaping.
pub(crate) fn absolutize_image(raw: &str) -> Option<String> {
    let url = decode_entities(raw.trim()).replace("\\/", "/");
    let url = if url.starts_with("//") {
        format!("https:{url}")
    } else {
        url
    };
    non_empty(url)
}

pub(crate) fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

/// Collapses runs of whitespace into single spaces and trims.
pub(crate) fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Removes the first matching storefront suffix, e.g. `-淘宝网`.
pub(crate) fn strip_title_suffixes(title: &str, suffixes: &[&str]) -> String {
    let title = title.trim();
    suffixes
        .iter()
        .find_map(|suffix| title.strip_suffix(suffix))
        .unwrap_or(title)
        .trim()
        .to_string()
}

pub(crate) fn query_param(address: &str, name: &str) -> Option<String> {
    let url = Url::parse(address).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
        .and_then(non_empty)
}

pub(crate) fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_tag_is_decoded_and_collapsed() {
        let html = "<html><head><TITLE>\n  保温杯 &amp; 盖子 \n</TITLE></head></html>";
        assert_eq!(title_tag(html).as_deref(), Some("保温杯 & 盖子"));
    }

    #[test]
    fn og_accepts_name_attribute() {
        let html = r#"<meta name="og:image" content="//img.alicdn.com/a.jpg">"#;
        assert_eq!(og(html, "og:image").as_deref(), Some("//img.alicdn.com/a.jpg"));
    }

    #[test]
    fn element_text_strips_nested_markup() {
        let html = r#"<div class="sku-name big"><img src="x.png"> 小米 手机 </div><div>other</div>"#;
        assert_eq!(
            element_text(html, "div", "class", "sku-name").as_deref(),
            Some("小米 手机")
        );
    }

    #[test]
    fn attr_name_must_stand_alone() {
        let tag = r#"<img data-src="lazy.png" src="real.png" data-class="x" class='main hero'>"#;
        assert_eq!(extract_attr(tag, "src").as_deref(), Some("real.png"));
        assert_eq!(extract_attr(tag, "class").as_deref(), Some("main hero"));
        assert_eq!(extract_attr(tag, "alt"), None);
    }

    #[test]
    fn attr_value_keeps_other_quote() {
        let tag = r#"<meta property="og:title" content="Bob's cup">"#;
        assert_eq!(extract_attr(tag, "content").as_deref(), Some("Bob's cup"));
        let tag = r#"<meta name='og:title' content='say "hi"'>"#;
        assert_eq!(extract_attr(tag, "content").as_deref(), Some(r#"say "hi""#));
    }

    #[test]
    fn find_tag_matches_tag_name_and_token() {
        let html = r#"<image id="spec-img"><IMG class="thumb" id="spec-img" src="a.jpg"><img id="other">"#;
        assert_eq!(
            find_tag(html, "img", "id", "spec-img"),
            Some(r#"<IMG class="thumb" id="spec-img" src="a.jpg">"#)
        );
        assert_eq!(find_tag(html, "div", "id", "spec-img"), None);
    }

    #[test]
    fn json_fields_skip_other_keys() {
        let html = r#"{"skuName":"手机","p":"1999.00","imgs":["//a.jpg","//b.jpg"],"price":59}"#;
        assert_eq!(json_string_field(html, "p").as_deref(), Some("1999.00"));
        assert_eq!(json_string_field(html, "price"), None);
        assert_eq!(json_number_field(html, "price"), Some(Decimal::new(59, 0)));
        assert_eq!(json_first_array_string(html, "imgs").as_deref(), Some("//a.jpg"));
        assert_eq!(json_first_array_string(html, "skuName"), None);
    }

    #[test]
    fn json_string_field_decodes_escapes() {
        let html = r#"var d = {"goodsName":"水杯 \"XL\"","url":"https:\/\/a.b\/c"};"#;
        assert_eq!(json_string_field(html, "goodsName").as_deref(), Some("水杯 \"XL\""));
        assert_eq!(json_string_field(html, "url").as_deref(), Some("https://a.b/c"));
    }

    #[test]
    fn json_number_field_reads_bare_and_quoted() {
        assert_eq!(
            json_number_field(r#"{"minGroupPrice": 1990}"#, "minGroupPrice"),
            Some(Decimal::new(1990, 0))
        );
        assert_eq!(
            json_number_field(r#"{"p":"59.90"}"#, "p"),
            Some(Decimal::new(5990, 2))
        );
    }

    #[test]
    fn parse_price_takes_first_number() {
        assert_eq!(parse_price("¥ 59.90 - 79.00"), Some(Decimal::new(5990, 2)));
        assert_eq!(parse_price("free"), None);
    }

    #[test]
    fn cents_are_divided_by_one_hundred() {
        assert_eq!(cents_to_price(Decimal::new(1990, 0)), Decimal::new(1990, 2));
    }

    #[test]
    fn protocol_relative_image_gets_https() {
        assert_eq!(
            absolutize_image(r"\/\/img.alicdn.com\/a.jpg").as_deref(),
            Some("https://img.alicdn.com/a.jpg")
        );
        assert_eq!(
            absolutize_image("http://img.example.cn/b.png").as_deref(),
            Some("http://img.example.cn/b.png")
        );
        assert_eq!(absolutize_image("  "), None);
    }

    #[test]
    fn strips_first_matching_suffix() {
        assert_eq!(
            strip_title_suffixes("保温杯-淘宝网", &["-淘宝网"]),
            "保温杯"
        );
        assert_eq!(strip_title_suffixes("保温杯", &["-淘宝网"]), "保温杯");
    }

    #[test]
    fn query_param_reads_decoded_value() {
        assert_eq!(
            query_param("https://item.taobao.com/item.htm?spm=a&id=123", "id").as_deref(),
            Some("123")
        );
        assert_eq!(query_param("https://item.taobao.com/item.htm", "id"), None);
        assert_eq!(query_param("not a url", "id"), None);
    }
}
