//! Page retrieval for a classified goods link.
//!
//! Two strategies exist: a network GET that follows redirects by hand so the
//! chain can be recorded and capped, and a direct read of a mirrored static
//! share page from local disk.

mod direct;
mod network;

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use goodslink_core::{AppConfig, PlatformKind};
use reqwest::Client;

use crate::error::ResolveError;

pub use direct::mirror_path;

/// Default total budget for one network fetch, redirects included.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default cap on followed redirects.
pub const DEFAULT_MAX_REDIRECTS: usize = 100;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Linux; Android 10) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Mobile Safari/537.36";

/// How a page is retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStrategy {
    NetworkFetch,
    DirectRead,
}

/// Picks [`SendStrategy::DirectRead`] only for platforms with static share
/// pages, and only when a mirror directory is configured.
#[must_use]
pub fn select_strategy(platform: PlatformKind, mirror_dir: Option<&Path>) -> SendStrategy {
    if mirror_dir.is_some() && platform.static_share_page() {
        SendStrategy::DirectRead
    } else {
        SendStrategy::NetworkFetch
    }
}

/// A retrieved page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub body: String,
    /// URL the body was served from after redirects.
    pub final_url: String,
    /// Every URL followed after the first, in order.
    pub redirect_chain: Vec<String>,
    pub strategy: SendStrategy,
}

/// Retrieval boundary used by the resolver.
pub trait PageFetcher: Send + Sync {
    fn fetch(
        &self,
        address: &str,
        platform: PlatformKind,
    ) -> impl Future<Output = Result<FetchedPage, ResolveError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub max_redirects: usize,
    pub user_agent: String,
    pub static_mirror_dir: Option<PathBuf>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            static_mirror_dir: None,
        }
    }
}

impl FetchConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.fetch_timeout_secs,
            max_redirects: config.fetch_max_redirects,
            user_agent: config.fetch_user_agent.clone(),
            static_mirror_dir: config.static_mirror_dir.clone(),
        }
    }
}

/// The production [`PageFetcher`]: network GET or mirror read per
/// [`select_strategy`]. Never retries.
#[derive(Debug, Clone)]
pub struct ContentFetcher {
    client: Client,
    config: FetchConfig,
}

impl ContentFetcher {
    /// # Errors
    ///
    /// Returns [`ResolveError::Client`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: FetchConfig) -> Result<Self, ResolveError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

impl PageFetcher for ContentFetcher {
    async fn fetch(
        &self,
        address: &str,
        platform: PlatformKind,
    ) -> Result<FetchedPage, ResolveError> {
        let mirror_dir = self.config.static_mirror_dir.as_deref();
        let strategy = select_strategy(platform, mirror_dir);
        tracing::info!(address, %platform, ?strategy, "fetching goods page");

        let result = match (strategy, mirror_dir) {
            (SendStrategy::DirectRead, Some(root)) => direct::read_mirror(root, address).await,
            _ => {
                network::fetch_following_redirects(
                    &self.client,
                    address,
                    self.config.max_redirects,
                    Duration::from_secs(self.config.timeout_secs),
                )
                .await
            }
        };

        match &result {
            Ok(page) => tracing::info!(
                address,
                final_url = %page.final_url,
                redirects = page.redirect_chain.len(),
                bytes = page.body.len(),
                "fetched goods page"
            ),
            Err(e) => tracing::warn!(address, error = %e, "goods page fetch failed"),
        }
        result
    }
}
