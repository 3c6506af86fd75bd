use std::path::{Path, PathBuf};

use reqwest::Url;

use super::{FetchedPage, SendStrategy};
use crate::error::ResolveError;

const INDEX_FILE: &str = "index.html";

/// Maps `address` onto `<root>/<host>/<path>`. A path ending in `/` (or an
/// empty path) maps to its `index.html`. `.` and `..` segments are dropped.
///
/// # Errors
///
/// Returns [`ResolveError::FetchFailed`] when the address is not a URL with a
/// host.
pub fn mirror_path(root: &Path, address: &str) -> Result<PathBuf, ResolveError> {
    let url = Url::parse(address)
        .map_err(|e| ResolveError::fetch_failed(address, format!("invalid URL: {e}")))?;
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ResolveError::fetch_failed(address, "URL has no host"))?;

    let mut path = root.join(host.to_ascii_lowercase());
    let segments: Vec<&str> = url
        .path()
        .split('/')
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .collect();
    for segment in &segments {
        path.push(segment);
    }
    if segments.is_empty() || url.path().ends_with('/') {
        path.push(INDEX_FILE);
    }
    Ok(path)
}

pub(super) async fn read_mirror(root: &Path, address: &str) -> Result<FetchedPage, ResolveError> {
    let path = mirror_path(root, address)?;
    let body = tokio::fs::read_to_string(&path).await.map_err(|e| {
        ResolveError::fetch_failed(address, format!("reading {}: {e}", path.display()))
    })?;

    Ok(FetchedPage {
        body,
        final_url: address.to_owned(),
        redirect_chain: Vec::new(),
        strategy: SendStrategy::DirectRead,
    })
}
