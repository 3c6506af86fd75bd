use goodslink_core::Capability;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("actor is not registered")]
    NotAuthenticated,

    #[error("actor {actor_id} lacks permission {permission}")]
    PermissionDenied {
        actor_id: i64,
        permission: &'static str,
    },

    #[error("no http(s) address found in text")]
    NoAddressFound,

    #[error("domain \"{domain}\" is not an allowed storefront")]
    DomainNotAllowed { domain: String },

    #[error("no supported platform matches host \"{host}\"")]
    UnclassifiedPlatform { host: String },

    #[error("address has no host")]
    MissingHost,

    #[error("fetching {url} failed: {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("{capability} extraction failed: {reason}")]
    ExtractionFailed {
        capability: Capability,
        reason: String,
    },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("goods store error: {0}")]
    Store(#[source] BoxError),

    #[error("authorization error: {0}")]
    Authorization(#[source] BoxError),
}

impl ResolveError {
    /// Stable, user-facing error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::InvalidInput(_) => "validation_error",
            ResolveError::NotAuthenticated => "not_authenticated",
            ResolveError::PermissionDenied { .. } => "permission_denied",
            ResolveError::NoAddressFound => "post_goods_not_found_address",
            ResolveError::DomainNotAllowed { .. } => "post_goods_does_not_resolve",
            ResolveError::UnclassifiedPlatform { .. } => "post_goods_not_found_enum",
            ResolveError::MissingHost => "post_goods_fail_url",
            ResolveError::FetchFailed { .. } => "post_goods_http_client_fail",
            ResolveError::ExtractionFailed { .. } => "post_goods_extraction_fail",
            ResolveError::Client(_) | ResolveError::Store(_) | ResolveError::Authorization(_) => {
                "internal_error"
            }
        }
    }

    /// `true` for failures caused by what the user submitted rather than by
    /// this service or its collaborators.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        !matches!(
            self,
            ResolveError::Client(_) | ResolveError::Store(_) | ResolveError::Authorization(_)
        )
    }

    pub(crate) fn fetch_failed(url: &str, reason: impl Into<String>) -> Self {
        ResolveError::FetchFailed {
            url: url.to_owned(),
            reason: reason.into(),
        }
    }
}
