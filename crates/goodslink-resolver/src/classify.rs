//! Host-token classification into a [`PlatformKind`].

use std::sync::LazyLock;

use goodslink_core::PlatformKind;
use regex::Regex;

use crate::error::ResolveError;

static HOST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:https|http)://([0-9a-z.]+)").expect("valid host regex"));

/// Pattern over the dot-separated labels of a host.
#[derive(Debug, Clone, Copy)]
enum TokenRule {
    /// Labels end with this exact sequence.
    Suffix(&'static [&'static str]),
    /// This exact sequence appears contiguously somewhere in the labels.
    Window(&'static [&'static str]),
    /// Any label equals this one.
    Label(&'static str),
    /// Any label equals any of these.
    AnyLabel(&'static [&'static str]),
}

impl TokenRule {
    fn matches(self, tokens: &[String]) -> bool {
        match self {
            TokenRule::Suffix(suffix) => {
                tokens.len() >= suffix.len()
                    && tokens[tokens.len() - suffix.len()..]
                        .iter()
                        .zip(suffix)
                        .all(|(t, s)| t == s)
            }
            TokenRule::Window(window) => tokens
                .windows(window.len())
                .any(|w| w.iter().zip(window).all(|(t, s)| t == s)),
            TokenRule::Label(label) => tokens.iter().any(|t| t == label),
            TokenRule::AnyLabel(labels) => tokens.iter().any(|t| labels.contains(&t.as_str())),
        }
    }
}

/// Checked top to bottom; mobile editions precede their desktop storefront.
const CLASSIFIER_RULES: [(TokenRule, PlatformKind); 8] = [
    (TokenRule::Suffix(&["tb", "cn"]), PlatformKind::TaobaoShare),
    (TokenRule::Window(&["m", "jd"]), PlatformKind::JdH5),
    (TokenRule::Label("jd"), PlatformKind::Jd),
    (TokenRule::Window(&["m", "youzan"]), PlatformKind::YouzanH5),
    (TokenRule::Label("youzan"), PlatformKind::Youzan),
    (TokenRule::Label("tmall"), PlatformKind::Tmall),
    (TokenRule::Label("taobao"), PlatformKind::Taobao),
    (
        TokenRule::AnyLabel(&["yangkeduo", "pinduoduo"]),
        PlatformKind::PinduoduoH5,
    ),
];

/// Splits the host of `address` into lower-cased labels.
///
/// # Errors
///
/// Returns [`ResolveError::MissingHost`] when no host can be read from the
/// address.
pub fn host_tokens(address: &str) -> Result<Vec<String>, ResolveError> {
    let host = HOST_RE
        .captures(address)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or(ResolveError::MissingHost)?;

    let tokens: Vec<String> = host
        .split('.')
        .filter(|label| !label.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();

    if tokens.is_empty() {
        return Err(ResolveError::MissingHost);
    }
    Ok(tokens)
}

/// Returns the platform of the first rule matching `tokens`.
///
/// # Errors
///
/// Returns [`ResolveError::UnclassifiedPlatform`] when no rule matches.
pub fn classify(tokens: &[String]) -> Result<PlatformKind, ResolveError> {
    CLASSIFIER_RULES
        .iter()
        .find(|(rule, _)| rule.matches(tokens))
        .map(|&(_, kind)| kind)
        .ok_or_else(|| ResolveError::UnclassifiedPlatform {
            host: tokens.join("."),
        })
}
