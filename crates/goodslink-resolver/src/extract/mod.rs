//! Platform-specific metadata extraction.
//!
//! Each [`Capability`] has one [`Extractor`]; the [`ExtractorRegistry`]
//! dispatches a classified [`PlatformKind`] to the extractor for its
//! capability. Extractors are rule-based over literal patterns and never
//! execute page scripts.

mod helpers;
mod jd;
mod pinduoduo;
mod taobao;
mod tmall;
mod youzan;

use std::collections::HashMap;
use std::sync::LazyLock;

use goodslink_core::{Capability, PlatformKind};
use regex::Regex;
use rust_decimal::Decimal;

use crate::error::ResolveError;

pub use jd::{JdExtractor, JdH5Extractor};
pub use pinduoduo::PinduoduoExtractor;
pub use taobao::{TaobaoExtractor, TaobaoShareExtractor};
pub use tmall::TmallExtractor;
pub use youzan::YouzanExtractor;

static BRACKET_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"【(.*)】").expect("valid bracket title regex"));

/// Title candidate from share text, e.g. `【保温杯】` → `保温杯`.
///
/// The capture is greedy, so text with several bracket pairs yields
/// everything between the first `【` and the last `】` on that line.
#[must_use]
pub fn bracket_title(text: &str) -> Option<&str> {
    BRACKET_TITLE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|t| !t.is_empty())
}

/// Everything an extractor may look at.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionInput<'a> {
    pub html: &'a str,
    /// The link located in the pasted text.
    pub address: &'a str,
    /// Where the page was actually served from.
    pub final_url: &'a str,
    pub ready_content: &'a str,
}

impl ExtractionInput<'_> {
    /// First hit of `lookup` against the located address, then the final URL.
    pub(crate) fn lookup_urls(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        lookup(self.address).or_else(|| lookup(self.final_url))
    }
}

/// Metadata as found on the page, before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMetadata {
    pub title: Option<String>,
    pub image_path: Option<String>,
    pub price: Option<Decimal>,
    pub platform_id: Option<String>,
}

pub trait Extractor: Send + Sync {
    fn capability(&self) -> Capability;

    /// # Errors
    ///
    /// Returns [`ResolveError::ExtractionFailed`] when the page cannot be
    /// interpreted at all.
    fn extract(&self, input: &ExtractionInput<'_>) -> Result<RawMetadata, ResolveError>;
}

/// Extractors keyed by capability. Read-only once built.
pub struct ExtractorRegistry {
    extractors: HashMap<Capability, Box<dyn Extractor>>,
}

impl ExtractorRegistry {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Registry holding an extractor for every capability.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(TaobaoExtractor));
        registry.register(Box::new(TmallExtractor));
        registry.register(Box::new(JdExtractor));
        registry.register(Box::new(JdH5Extractor));
        registry.register(Box::new(PinduoduoExtractor));
        registry.register(Box::new(YouzanExtractor));
        registry.register(Box::new(TaobaoShareExtractor));
        registry
    }

    /// Adds an extractor, replacing any previous one for the same capability.
    pub fn register(&mut self, extractor: Box<dyn Extractor>) {
        self.extractors.insert(extractor.capability(), extractor);
    }

    #[must_use]
    pub fn get(&self, kind: PlatformKind) -> Option<&dyn Extractor> {
        self.extractors.get(&kind.capability()).map(Box::as_ref)
    }

    #[must_use]
    pub fn supports(&self, kind: PlatformKind) -> bool {
        self.extractors.contains_key(&kind.capability())
    }

    /// Runs the extractor for `kind` over `input`.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::UnclassifiedPlatform`] when no extractor handles `kind`.
    /// - [`ResolveError::ExtractionFailed`] when the page body is empty or the
    ///   extractor rejects it.
    pub fn extract(
        &self,
        kind: PlatformKind,
        input: &ExtractionInput<'_>,
    ) -> Result<RawMetadata, ResolveError> {
        let extractor = self
            .get(kind)
            .ok_or_else(|| ResolveError::UnclassifiedPlatform {
                host: kind.to_string(),
            })?;

        if input.html.trim().is_empty() {
            return Err(ResolveError::ExtractionFailed {
                capability: extractor.capability(),
                reason: "page body is empty".to_string(),
            });
        }

        extractor.extract(input)
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut capabilities: Vec<&str> = self.extractors.keys().map(|c| c.as_str()).collect();
        capabilities.sort_unstable();
        f.debug_struct("ExtractorRegistry")
            .field("capabilities", &capabilities)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(html: &str) -> ExtractionInput<'_> {
        ExtractionInput {
            html,
            address: "https://item.jd.com/100.html",
            final_url: "https://item.jd.com/100.html",
            ready_content: "https://item.jd.com/100.html",
        }
    }

    #[test]
    fn bracket_title_captures_inner_text() {
        assert_eq!(
            bracket_title("【保温杯 500ml】https://m.tb.cn/h.x 点击链接"),
            Some("保温杯 500ml")
        );
        assert_eq!(bracket_title("no brackets"), None);
        assert_eq!(bracket_title("【 】"), None);
    }

    #[test]
    fn builtin_registry_covers_every_platform() {
        let registry = ExtractorRegistry::builtin();
        for kind in PlatformKind::ALL {
            let extractor = registry.get(kind).expect("extractor registered");
            assert_eq!(extractor.capability(), kind.capability());
        }
    }

    #[test]
    fn empty_body_fails_extraction() {
        let err = ExtractorRegistry::builtin()
            .extract(PlatformKind::Jd, &input("   "))
            .unwrap_err();
        assert!(
            matches!(err, ResolveError::ExtractionFailed { capability: Capability::Jd, .. }),
            "got: {err:?}"
        );
    }

    #[test]
    fn missing_extractor_is_unclassified() {
        let err = ExtractorRegistry::empty()
            .extract(PlatformKind::Jd, &input("<html></html>"))
            .unwrap_err();
        assert!(matches!(err, ResolveError::UnclassifiedPlatform { .. }));
        assert!(!ExtractorRegistry::empty().supports(PlatformKind::Jd));
    }

    #[test]
    fn youzan_h5_shares_the_youzan_extractor() {
        let registry = ExtractorRegistry::builtin();
        assert_eq!(
            registry.get(PlatformKind::YouzanH5).map(Extractor::capability),
            Some(Capability::Youzan)
        );
    }
}
