//! Cleanup passes applied to pasted text before it is stored as `ready_content`.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::domain::ValidatedHost;

static DOTTED_QUAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]+\.[0-9]+\.[0-9]+\.[0-9]+").expect("valid dotted quad regex")
});

static DOMAIN_FRAGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://[^\s:/]*?\.[^\s:/]+?\.(?:cn|com)").expect("valid fragment regex")
});

/// Stand-in for the validated origin while fragments are removed. Contains
/// no scheme so the fragment pattern can never match it.
const ORIGIN_MASK: &str = "\u{0}goodslink-origin\u{0}";

/// Deletes every well-formed IPv4 address from `text` in a single pass.
/// Dotted quads with an out-of-range octet are left in place.
#[must_use]
pub fn strip_ipv4(text: &str) -> String {
    DOTTED_QUAD_RE
        .replace_all(text, |caps: &Captures<'_>| {
            if is_ipv4(&caps[0]) {
                String::new()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Removes mirrored `http(s)://sub.domain.tld` fragments that share links
/// embed, keeping the first occurrence of the validated origin intact.
#[must_use]
pub fn strip_domain_fragments(text: &str, host: &ValidatedHost) -> String {
    let masked = text.replacen(&host.origin, ORIGIN_MASK, 1);
    let stripped = DOMAIN_FRAGMENT_RE.replace_all(&masked, "");
    stripped.replacen(ORIGIN_MASK, &host.origin, 1)
}

/// Octets are 0–255; a three-digit octet must start with `1` or `2`.
fn is_ipv4(quad: &str) -> bool {
    let octets: Vec<&str> = quad.split('.').collect();
    octets.len() == 4 && octets.iter().all(|o| is_octet(o))
}

fn is_octet(octet: &str) -> bool {
    match octet.len() {
        1 | 2 => true,
        3 => match octet.as_bytes()[0] {
            b'1' => true,
            b'2' => octet.parse::<u16>().is_ok_and(|v| v <= 255),
            _ => false,
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taobao_host() -> ValidatedHost {
        ValidatedHost {
            origin: "https://item.taobao.com".to_string(),
            host: "item.taobao.com".to_string(),
            domain: "taobao.com".to_string(),
        }
    }

    #[test]
    fn strips_valid_ip_and_keeps_invalid_quad() {
        let cleaned = strip_ipv4("from 192.168.1.10 and 999.1.1.1 done");
        assert_eq!(cleaned, "from  and 999.1.1.1 done");
    }

    #[test]
    fn strips_every_occurrence_of_an_ip() {
        let cleaned = strip_ipv4("10.0.0.1/10.0.0.1");
        assert_eq!(cleaned, "/");
    }

    #[test]
    fn address_inside_a_longer_quad_is_not_split() {
        let cleaned = strip_ipv4("a 21.1.1.10 b 1.1.1.1 c");
        assert_eq!(cleaned, "a  b  c");
    }

    #[test]
    fn octet_boundaries() {
        assert!(is_ipv4("0.0.0.0"));
        assert!(is_ipv4("255.255.255.255"));
        assert!(is_ipv4("199.249.250.07"));
        assert!(!is_ipv4("256.1.1.1"));
        assert!(!is_ipv4("1.1.1.300"));
        assert!(!is_ipv4("012.1.1.1"));
        assert!(!is_ipv4("1234.1.1.1"));
    }

    #[test]
    fn text_without_quads_is_unchanged() {
        let text = "https://item.taobao.com/item.htm?id=1";
        assert_eq!(strip_ipv4(text), text);
    }

    #[test]
    fn removes_mirrored_fragments_but_keeps_origin() {
        let text = "https://item.taobao.com/item.htm?id=1 https://a.m.tb.cn/h.x http://s.click.taobao.com/y";
        let cleaned = strip_domain_fragments(text, &taobao_host());
        assert_eq!(cleaned, "https://item.taobao.com/item.htm?id=1 /h.x /y");
    }

    #[test]
    fn only_first_origin_occurrence_survives() {
        let text = "https://item.taobao.com/a https://item.taobao.com/b";
        let cleaned = strip_domain_fragments(text, &taobao_host());
        assert_eq!(cleaned, "https://item.taobao.com/a /b");
    }

    #[test]
    fn non_cn_com_fragments_are_kept() {
        let text = "https://item.taobao.com/a https://docs.example.org/b";
        let cleaned = strip_domain_fragments(text, &taobao_host());
        assert_eq!(cleaned, text);
    }
}
