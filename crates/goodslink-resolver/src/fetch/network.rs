use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use super::{FetchedPage, SendStrategy};
use crate::error::ResolveError;

/// GETs `address`, following up to `max_redirects` redirects, all within
/// `budget`. Only a final `200 OK` is accepted.
pub(super) async fn fetch_following_redirects(
    client: &Client,
    address: &str,
    max_redirects: usize,
    budget: Duration,
) -> Result<FetchedPage, ResolveError> {
    tokio::time::timeout(budget, follow(client, address, max_redirects))
        .await
        .map_err(|_| {
            ResolveError::fetch_failed(
                address,
                format!("timed out after {}s", budget.as_secs()),
            )
        })?
}

async fn follow(
    client: &Client,
    address: &str,
    max_redirects: usize,
) -> Result<FetchedPage, ResolveError> {
    let mut url = Url::parse(address)
        .map_err(|e| ResolveError::fetch_failed(address, format!("invalid URL: {e}")))?;
    let mut chain: Vec<String> = Vec::new();

    loop {
        let response = client
            .get(url.clone())
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "zh-CN,zh;q=0.9,en;q=0.8")
            .send()
            .await
            .map_err(|e| ResolveError::fetch_failed(url.as_str(), e.to_string()))?;
        let status = response.status();

        if status.is_redirection() {
            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| {
                    ResolveError::fetch_failed(
                        url.as_str(),
                        format!("status {} without Location header", status.as_u16()),
                    )
                })?;

            if chain.len() >= max_redirects {
                return Err(ResolveError::fetch_failed(
                    address,
                    format!("exceeded {max_redirects} redirects"),
                ));
            }

            let next = url.join(location).map_err(|e| {
                ResolveError::fetch_failed(url.as_str(), format!("bad Location \"{location}\": {e}"))
            })?;
            tracing::debug!(from = %url, to = %next, hop = chain.len() + 1, "following redirect");
            chain.push(next.to_string());
            url = next;
            continue;
        }

        if status != StatusCode::OK {
            return Err(ResolveError::fetch_failed(
                url.as_str(),
                format!("unexpected status {}", status.as_u16()),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ResolveError::fetch_failed(url.as_str(), e.to_string()))?;

        return Ok(FetchedPage {
            body,
            final_url: url.to_string(),
            redirect_chain: chain,
            strategy: SendStrategy::NetworkFetch,
        });
    }
}
