use std::sync::LazyLock;

use regex::Regex;

use crate::error::ResolveError;

static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:https|http):\S+").expect("valid address regex"));

/// Returns the first `http:`/`https:` run of non-whitespace characters in `text`.
///
/// # Errors
///
/// Returns [`ResolveError::NoAddressFound`] when the text contains no such run.
pub fn locate_address(text: &str) -> Result<&str, ResolveError> {
    ADDRESS_RE
        .find(text)
        .map(|m| m.as_str())
        .ok_or(ResolveError::NoAddressFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_address_inside_share_text() {
        let text = "【淘宝】https://m.tb.cn/h.5Xyz?tk=abc 「保温杯」 点击链接直接打开";
        assert_eq!(
            locate_address(text).unwrap(),
            "https://m.tb.cn/h.5Xyz?tk=abc"
        );
    }

    #[test]
    fn returns_first_of_several_addresses() {
        let text = "see http://item.jd.com/1.html or https://item.taobao.com/item.htm?id=2";
        assert_eq!(locate_address(text).unwrap(), "http://item.jd.com/1.html");
    }

    #[test]
    fn scheme_match_is_case_insensitive() {
        assert_eq!(
            locate_address("HTTPS://ITEM.JD.COM/1.html").unwrap(),
            "HTTPS://ITEM.JD.COM/1.html"
        );
    }

    #[test]
    fn text_without_scheme_fails() {
        for text in ["", "just words", "item.taobao.com/item.htm?id=1", "ftp://x.com"] {
            assert!(
                matches!(locate_address(text), Err(ResolveError::NoAddressFound)),
                "expected NoAddressFound for {text:?}"
            );
        }
    }
}
