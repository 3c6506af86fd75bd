use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// YAML file holding business-defined goods data (placeholder titles).
    pub goods_config_path: PathBuf,
    /// Base URL that default platform icons are served from.
    pub asset_base_url: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub fetch_timeout_secs: u64,
    pub fetch_max_redirects: usize,
    pub fetch_user_agent: String,
    /// Local directory of mirrored static share pages. `None` disables
    /// direct reads entirely.
    pub static_mirror_dir: Option<PathBuf>,
    pub max_input_chars: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("goods_config_path", &self.goods_config_path)
            .field("asset_base_url", &self.asset_base_url)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("fetch_max_redirects", &self.fetch_max_redirects)
            .field("fetch_user_agent", &self.fetch_user_agent)
            .field("static_mirror_dir", &self.static_mirror_dir)
            .field("max_input_chars", &self.max_input_chars)
            .finish()
    }
}
