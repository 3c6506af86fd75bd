//! The closed set of supported storefront platforms.
//!
//! Every platform variant carries a stable integer key (persisted as the
//! `type` column of `post_goods`), a display name used as the fallback title,
//! a default icon, and the extraction capability that parses its pages.

use serde::{Deserialize, Serialize};

/// A supported storefront variant. Desktop and mobile/H5 editions of the same
/// storefront are separate variants with separate keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformKind {
    Taobao,
    Tmall,
    Jd,
    PinduoduoH5,
    Youzan,
    /// `m.tb.cn` share links produced by the Taobao app's share sheet.
    TaobaoShare,
    JdH5,
    YouzanH5,
}

/// Platform-specific page parser a [`PlatformKind`] dispatches into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Taobao,
    Tmall,
    Jd,
    JdH5,
    Pinduoduo,
    Youzan,
    TaobaoShare,
}

impl Capability {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::Taobao => "taobao",
            Capability::Tmall => "tmall",
            Capability::Jd => "jd",
            Capability::JdH5 => "jd_h5",
            Capability::Pinduoduo => "pinduoduo",
            Capability::Youzan => "youzan",
            Capability::TaobaoShare => "taobao_share",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static configuration row for one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformSpec {
    pub kind: PlatformKind,
    pub key: i16,
    pub display_name: &'static str,
    /// File name under `/images/goods/`.
    pub default_icon: &'static str,
    pub capability: Capability,
    /// Whether a draft with the same `【title】` from the pasted text counts
    /// as a duplicate before fetching.
    pub title_dedupe: bool,
    /// Whether the platform's share pages are static documents that may be
    /// served from a local mirror instead of the network.
    pub static_share_page: bool,
}

/// Indexed by platform key.
pub const PLATFORMS: [PlatformSpec; 8] = [
    PlatformSpec {
        kind: PlatformKind::Taobao,
        key: 0,
        display_name: "淘宝商品",
        default_icon: "taobao.svg",
        capability: Capability::Taobao,
        title_dedupe: false,
        static_share_page: false,
    },
    PlatformSpec {
        kind: PlatformKind::Tmall,
        key: 1,
        display_name: "天猫商品",
        default_icon: "tmall.svg",
        capability: Capability::Tmall,
        title_dedupe: false,
        static_share_page: false,
    },
    PlatformSpec {
        kind: PlatformKind::Jd,
        key: 2,
        display_name: "京东商品",
        default_icon: "jd.svg",
        capability: Capability::Jd,
        title_dedupe: false,
        static_share_page: false,
    },
    PlatformSpec {
        kind: PlatformKind::PinduoduoH5,
        key: 3,
        display_name: "拼多多商品",
        default_icon: "pdd.svg",
        capability: Capability::Pinduoduo,
        title_dedupe: false,
        static_share_page: false,
    },
    PlatformSpec {
        kind: PlatformKind::Youzan,
        key: 4,
        display_name: "有赞商品",
        default_icon: "youzan.svg",
        capability: Capability::Youzan,
        title_dedupe: false,
        static_share_page: false,
    },
    PlatformSpec {
        kind: PlatformKind::TaobaoShare,
        key: 5,
        display_name: "淘宝商品",
        default_icon: "taobao.svg",
        capability: Capability::TaobaoShare,
        title_dedupe: true,
        static_share_page: true,
    },
    PlatformSpec {
        kind: PlatformKind::JdH5,
        key: 6,
        display_name: "京东商品",
        default_icon: "jd.svg",
        capability: Capability::JdH5,
        title_dedupe: false,
        static_share_page: false,
    },
    PlatformSpec {
        kind: PlatformKind::YouzanH5,
        key: 7,
        display_name: "有赞商品",
        default_icon: "youzan.svg",
        capability: Capability::Youzan,
        title_dedupe: false,
        static_share_page: false,
    },
];

impl PlatformKind {
    pub const ALL: [PlatformKind; 8] = [
        PlatformKind::Taobao,
        PlatformKind::Tmall,
        PlatformKind::Jd,
        PlatformKind::PinduoduoH5,
        PlatformKind::Youzan,
        PlatformKind::TaobaoShare,
        PlatformKind::JdH5,
        PlatformKind::YouzanH5,
    ];

    #[must_use]
    pub const fn key(self) -> i16 {
        match self {
            PlatformKind::Taobao => 0,
            PlatformKind::Tmall => 1,
            PlatformKind::Jd => 2,
            PlatformKind::PinduoduoH5 => 3,
            PlatformKind::Youzan => 4,
            PlatformKind::TaobaoShare => 5,
            PlatformKind::JdH5 => 6,
            PlatformKind::YouzanH5 => 7,
        }
    }

    #[must_use]
    pub fn from_key(key: i16) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    #[must_use]
    pub fn spec(self) -> &'static PlatformSpec {
        // key() is the PLATFORMS index; asserted in tests.
        &PLATFORMS[usize::from(self.key().unsigned_abs())]
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        self.spec().display_name
    }

    #[must_use]
    pub fn default_icon(self) -> &'static str {
        self.spec().default_icon
    }

    #[must_use]
    pub fn capability(self) -> Capability {
        self.spec().capability
    }

    #[must_use]
    pub fn title_dedupe(self) -> bool {
        self.spec().title_dedupe
    }

    #[must_use]
    pub fn static_share_page(self) -> bool {
        self.spec().static_share_page
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PlatformKind::Taobao => "taobao",
            PlatformKind::Tmall => "tmall",
            PlatformKind::Jd => "jd",
            PlatformKind::PinduoduoH5 => "pinduoduo_h5",
            PlatformKind::Youzan => "youzan",
            PlatformKind::TaobaoShare => "taobao_share",
            PlatformKind::JdH5 => "jd_h5",
            PlatformKind::YouzanH5 => "youzan_h5",
        }
    }
}

impl std::fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
