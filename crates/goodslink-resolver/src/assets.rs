/// Builds public URLs for static assets served next to the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetUrls {
    base_url: String,
}

impl AssetUrls {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// Absolute URL for `path`, relative to the asset base.
    #[must_use]
    pub fn to(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// URL of a goods platform icon, e.g. `taobao.svg`.
    #[must_use]
    pub fn icon_url(&self, icon: &str) -> String {
        self.to(&format!("images/goods/{icon}"))
    }
}
