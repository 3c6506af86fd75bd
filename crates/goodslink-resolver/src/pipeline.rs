//! End-to-end resolution of pasted text into a stored goods record.

use goodslink_core::{
    Actor, Authorizer, ContentType, GoodsConfig, GoodsStore, PlatformKind, ProductRecord,
};

use crate::assets::AssetUrls;
use crate::classify::{classify, host_tokens};
use crate::domain::{validate_domain, ValidatedHost};
use crate::error::ResolveError;
use crate::extract::{bracket_title, ExtractionInput, ExtractorRegistry};
use crate::fetch::{ContentFetcher, PageFetcher};
use crate::locate::locate_address;
use crate::normalize::{normalize_metadata, normalize_title};
use crate::record::build_record;
use crate::sanitize::{strip_domain_fragments, strip_ipv4};

/// Longest accepted input, in characters.
pub const DEFAULT_MAX_INPUT_CHARS: usize = 1500;

/// Per-request link context. Built once by [`prepare_link`] and only read
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedLink {
    /// The located link, as it appeared in the text.
    pub address: String,
    /// Present for `https` links that passed the allow-list.
    pub host: Option<ValidatedHost>,
    /// The pasted text after fragment and IP stripping.
    pub ready_content: String,
    pub platform: PlatformKind,
}

/// Runs every offline stage: locate, validate, sanitize, classify.
///
/// # Errors
///
/// - [`ResolveError::NoAddressFound`] when the text holds no link.
/// - [`ResolveError::DomainNotAllowed`] for `https` links off the allow-list.
/// - [`ResolveError::MissingHost`] when no host can be read from the link.
/// - [`ResolveError::UnclassifiedPlatform`] when no platform matches the host.
pub fn prepare_link(raw_text: &str) -> Result<PreparedLink, ResolveError> {
    let address = locate_address(raw_text)?;
    let host = validate_domain(address)?;

    let without_fragments = match &host {
        Some(validated) => strip_domain_fragments(raw_text, validated),
        None => raw_text.to_owned(),
    };
    let ready_content = strip_ipv4(&without_fragments);

    let tokens = host_tokens(address)?;
    let platform = classify(&tokens)?;

    Ok(PreparedLink {
        address: address.to_owned(),
        host,
        ready_content,
        platform,
    })
}

/// Orchestrates one resolution per call. Holds only read-only tables and
/// collaborators, so a single instance is shared across requests.
pub struct GoodsResolver<S, A, F = ContentFetcher> {
    store: S,
    authorizer: A,
    fetcher: F,
    extractors: ExtractorRegistry,
    assets: AssetUrls,
    goods_config: GoodsConfig,
    max_input_chars: usize,
}

impl<S, A, F> GoodsResolver<S, A, F>
where
    S: GoodsStore,
    A: Authorizer,
    F: PageFetcher,
{
    #[must_use]
    pub fn new(
        store: S,
        authorizer: A,
        fetcher: F,
        assets: AssetUrls,
        goods_config: GoodsConfig,
    ) -> Self {
        Self {
            store,
            authorizer,
            fetcher,
            extractors: ExtractorRegistry::builtin(),
            assets,
            goods_config,
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
        }
    }

    #[must_use]
    pub fn with_extractors(mut self, extractors: ExtractorRegistry) -> Self {
        self.extractors = extractors;
        self
    }

    #[must_use]
    pub fn with_max_input_chars(mut self, max_input_chars: usize) -> Self {
        self.max_input_chars = max_input_chars;
        self
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Resolves `raw_text` into a draft goods record owned by `actor`.
    ///
    /// An existing draft with the same sanitized text is returned without
    /// fetching, unless its title is a configured placeholder. For platforms
    /// that opt in, an existing draft with the same `【title】` is returned
    /// as well.
    ///
    /// # Errors
    ///
    /// Fails fast with the [`ResolveError`] of the first stage that rejects
    /// the input; nothing is retried.
    pub async fn resolve(&self, actor: &Actor, raw_text: &str) -> Result<ProductRecord, ResolveError> {
        self.validate_input(raw_text)?;
        self.authorize(actor).await?;

        let link = prepare_link(raw_text)?;
        if !self.extractors.supports(link.platform) {
            return Err(ResolveError::UnclassifiedPlatform {
                host: link
                    .host
                    .as_ref()
                    .map_or_else(|| link.address.clone(), |h| h.host.clone()),
            });
        }

        if let Some(existing) = self.find_duplicate(actor, &link).await? {
            return Ok(existing);
        }

        let page = self.fetcher.fetch(&link.address, link.platform).await?;
        let input = ExtractionInput {
            html: &page.body,
            address: &link.address,
            final_url: &page.final_url,
            ready_content: &link.ready_content,
        };
        let raw = self.extractors.extract(link.platform, &input)?;
        let meta = normalize_metadata(raw, link.platform, &self.assets);

        let record = build_record(actor.id, &link, meta);
        let stored = self
            .store
            .insert(record)
            .await
            .map_err(|e| ResolveError::Store(Box::new(e)))?;

        tracing::info!(
            owner_id = actor.id,
            goods_id = stored.id,
            platform = %link.platform,
            redirects = page.redirect_chain.len(),
            "goods link resolved"
        );
        Ok(stored)
    }

    fn validate_input(&self, raw_text: &str) -> Result<(), ResolveError> {
        if raw_text.trim().is_empty() {
            return Err(ResolveError::InvalidInput("address is required".to_string()));
        }
        let chars = raw_text.chars().count();
        if chars > self.max_input_chars {
            return Err(ResolveError::InvalidInput(format!(
                "address must be at most {} characters (got {chars})",
                self.max_input_chars
            )));
        }
        Ok(())
    }

    async fn authorize(&self, actor: &Actor) -> Result<(), ResolveError> {
        if actor.is_guest() {
            return Err(ResolveError::NotAuthenticated);
        }

        let content = ContentType::Goods;
        let allowed = self
            .authorizer
            .can_create(actor, content)
            .await
            .map_err(|e| ResolveError::Authorization(Box::new(e)))?;
        if !allowed {
            tracing::warn!(actor_id = actor.id, "goods link rejected: permission denied");
            return Err(ResolveError::PermissionDenied {
                actor_id: actor.id,
                permission: content.create_permission(),
            });
        }
        Ok(())
    }

    async fn find_duplicate(
        &self,
        actor: &Actor,
        link: &PreparedLink,
    ) -> Result<Option<ProductRecord>, ResolveError> {
        let by_content = self
            .store
            .find_draft_by_content(actor.id, &link.ready_content)
            .await
            .map_err(|e| ResolveError::Store(Box::new(e)))?;

        if let Some(existing) = by_content {
            if !self.goods_config.is_placeholder_title(&existing.title) {
                tracing::debug!(
                    owner_id = actor.id,
                    goods_id = existing.id,
                    "returning existing draft with identical content"
                );
                return Ok(Some(existing));
            }
            tracing::debug!(
                owner_id = actor.id,
                goods_id = existing.id,
                title = %existing.title,
                "existing draft has placeholder title; resolving again"
            );
        }

        if !link.platform.title_dedupe() {
            return Ok(None);
        }
        let Some(title) = bracket_title(&link.ready_content).and_then(normalize_title) else {
            return Ok(None);
        };

        let by_title = self
            .store
            .find_draft_by_title(actor.id, &title)
            .await
            .map_err(|e| ResolveError::Store(Box::new(e)))?;
        if let Some(existing) = &by_title {
            tracing::debug!(
                owner_id = actor.id,
                goods_id = existing.id,
                "returning existing draft with identical share title"
            );
        }
        Ok(by_title)
    }
}

impl<S, A, F> std::fmt::Debug for GoodsResolver<S, A, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoodsResolver")
            .field("extractors", &self.extractors)
            .field("assets", &self.assets)
            .field("goods_config", &self.goods_config)
            .field("max_input_chars", &self.max_input_chars)
            .finish_non_exhaustive()
    }
}
