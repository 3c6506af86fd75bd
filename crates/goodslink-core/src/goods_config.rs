use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Business-defined goods data loaded from `config/goods.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodsConfig {
    /// Titles that mark a stored draft as "extraction never found a real
    /// title". A draft carrying one of these is re-resolved instead of
    /// being returned as a duplicate.
    pub placeholder_titles: Vec<String>,
}

impl Default for GoodsConfig {
    fn default() -> Self {
        Self {
            placeholder_titles: ["淘宝商品", "天猫商品", "京东商品", "有赞商品"]
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

impl GoodsConfig {
    #[must_use]
    pub fn is_placeholder_title(&self, title: &str) -> bool {
        self.placeholder_titles.iter().any(|t| t == title)
    }
}

/// Load and validate the goods configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_goods_config(path: &Path) -> Result<GoodsConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::GoodsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_goods_config(&content)
}

/// Like [`load_goods_config`], but a missing file yields
/// [`GoodsConfig::default`]. A file that exists and does not parse is still
/// an error.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read, parsed, or
/// fails validation.
pub fn load_goods_config_or_default(path: &Path) -> Result<GoodsConfig, ConfigError> {
    match load_goods_config(path) {
        Err(ConfigError::GoodsFileIo { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            tracing::warn!(
                path = %path.display(),
                "goods config not found; using built-in placeholder titles"
            );
            Ok(GoodsConfig::default())
        }
        other => other,
    }
}

fn parse_goods_config(content: &str) -> Result<GoodsConfig, ConfigError> {
    let config: GoodsConfig = serde_yaml::from_str(content).map_err(ConfigError::GoodsFileParse)?;
    validate_goods_config(&config)?;
    Ok(config)
}

fn validate_goods_config(config: &GoodsConfig) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for title in &config.placeholder_titles {
        if title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "placeholder title must be non-empty".to_string(),
            ));
        }
        if !seen.insert(title.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate placeholder title: '{title}'"
            )));
        }
    }

    Ok(())
}
