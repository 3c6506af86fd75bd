use goodslink_core::PlatformKind;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::assets::AssetUrls;
use crate::extract::RawMetadata;

/// Longest stored title, in characters.
pub(crate) const MAX_TITLE_CHARS: usize = 255;

/// Largest price the `NUMERIC(10, 2)` column holds.
const MAX_PRICE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Metadata with platform defaults applied; every field is populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedMetadata {
    pub title: String,
    pub image_path: String,
    pub price: Decimal,
    pub platform_id: String,
}

/// Fills gaps in `raw` with the platform's display name, default icon and a
/// zero price. Prices are rounded half-up to two decimal places; a price the
/// column cannot hold is stored as zero.
#[must_use]
pub fn normalize_metadata(
    raw: RawMetadata,
    platform: PlatformKind,
    assets: &AssetUrls,
) -> NormalizedMetadata {
    let title = raw
        .title
        .as_deref()
        .and_then(normalize_title)
        .unwrap_or_else(|| platform.display_name().to_string());

    let image_path = raw
        .image_path
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| assets.icon_url(platform.default_icon()));

    let price = raw
        .price
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let price = if (Decimal::ZERO..=MAX_PRICE).contains(&price) {
        price
    } else {
        tracing::warn!(platform = %platform, %price, "extracted price out of range; storing 0");
        Decimal::ZERO
    };

    let platform_id = raw
        .platform_id
        .map(|id| id.trim().to_string())
        .unwrap_or_default();

    NormalizedMetadata {
        title,
        image_path,
        price,
        platform_id,
    }
}

/// Collapses whitespace runs and caps the result at [`MAX_TITLE_CHARS`].
/// Stored titles and duplicate-lookup keys both go through here.
pub(crate) fn normalize_title(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let capped: String = collapsed.chars().take(MAX_TITLE_CHARS).collect();
    let title = capped.trim_end();
    (!title.is_empty()).then(|| title.to_string())
}
