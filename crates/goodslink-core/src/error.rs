use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read goods config at {path}: {source}")]
    GoodsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse goods config: {0}")]
    GoodsFileParse(#[source] serde_yaml::Error),

    #[error("goods config validation failed: {0}")]
    Validation(String),
}
