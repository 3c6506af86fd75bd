//! Goods-link resolution: turns pasted text containing a storefront link
//! into a deduplicated product record.

pub mod assets;
pub mod classify;
pub mod domain;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod locate;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod sanitize;

pub use assets::AssetUrls;
pub use classify::{classify, host_tokens};
pub use domain::{validate_domain, ValidatedHost, ALLOWED_DOMAINS};
pub use error::ResolveError;
pub use extract::{bracket_title, ExtractionInput, Extractor, ExtractorRegistry, RawMetadata};
pub use fetch::{select_strategy, ContentFetcher, FetchConfig, FetchedPage, PageFetcher, SendStrategy};
pub use locate::locate_address;
pub use normalize::{normalize_metadata, NormalizedMetadata};
pub use pipeline::{prepare_link, GoodsResolver, PreparedLink};
pub use record::build_record;
pub use sanitize::{strip_domain_fragments, strip_ipv4};
