pub mod app_config;
pub mod config;
pub mod error;
pub mod goods;
pub mod goods_config;
pub mod platform;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use goods::{Actor, Authorizer, ContentType, GoodsStore, NewProductRecord, ProductRecord};
pub use goods_config::{load_goods_config, load_goods_config_or_default, GoodsConfig};
pub use platform::{Capability, PlatformKind, PlatformSpec};
