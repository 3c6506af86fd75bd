//! Allow-list validation of the registrable domain of `https` addresses.

use crate::error::ResolveError;

/// Registrable domains a goods link may point at.
pub const ALLOWED_DOMAINS: [&str; 9] = [
    "taobao.com",
    "tmall.com",
    "detail.tmall.com",
    "jd.com",
    "m.jd.com",
    "yangkeduo.com",
    "youzan.com",
    "m.youzan.com",
    "tb.cn",
];

const HTTPS_SCHEME: &str = "https://";

/// An `https` host that passed the allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedHost {
    /// `https://<host>` exactly as it appears in the address (case preserved).
    pub origin: String,
    /// Lower-cased host, e.g. `item.taobao.com`.
    pub host: String,
    /// Registrable domain checked against [`ALLOWED_DOMAINS`], e.g. `taobao.com`.
    pub domain: String,
}

/// Validates an address's registrable domain against [`ALLOWED_DOMAINS`].
///
/// Only `https` addresses are checked. Addresses with any other scheme, or
/// whose host cannot be parsed, skip validation and yield `Ok(None)`.
///
/// # Errors
///
/// Returns [`ResolveError::DomainNotAllowed`] when an `https` host's
/// registrable domain is not on the allow-list (including every domain
/// outside `.cn`/`.com`).
pub fn validate_domain(address: &str) -> Result<Option<ValidatedHost>, ResolveError> {
    let Some(scheme) = address.get(..HTTPS_SCHEME.len()) else {
        return Ok(None);
    };
    if !scheme.eq_ignore_ascii_case(HTTPS_SCHEME) {
        return Ok(None);
    }

    let rest = &address[HTTPS_SCHEME.len()..];
    let authority_len = rest.find(['/', '?', '#', ':']).unwrap_or(rest.len());
    let origin = &address[..HTTPS_SCHEME.len() + authority_len];

    let Some(host) = reqwest::Url::parse(origin)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
        .filter(|h| !h.is_empty())
    else {
        tracing::debug!(address, "https address has no parseable host; skipping domain check");
        return Ok(None);
    };

    let domain = registrable_domain(&host);
    let allowed = (domain.ends_with(".com") || domain.ends_with(".cn"))
        && ALLOWED_DOMAINS.contains(&domain.as_str());

    if !allowed {
        return Err(ResolveError::DomainNotAllowed { domain });
    }

    Ok(Some(ValidatedHost {
        origin: origin.to_owned(),
        host,
        domain,
    }))
}

/// Drops the leftmost label: `item.taobao.com` → `taobao.com`. Two-label
/// hosts are returned unchanged.
fn registrable_domain(host: &str) -> String {
    let host = host.trim_end_matches('.');
    match host.split_once('.') {
        Some((_, rest)) if rest.contains('.') => rest.to_owned(),
        _ => host.to_owned(),
    }
}
