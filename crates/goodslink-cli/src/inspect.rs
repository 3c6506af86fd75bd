//! Offline view of the locate, sanitize and classify stages.

use goodslink_resolver::{bracket_title, prepare_link, ResolveError};
use serde_json::{json, Value};

/// Runs every stage that needs neither the network nor the database.
///
/// Rejections come back as `{ "error": { code, message } }` so the output
/// shape does not depend on whether the text resolves.
pub(crate) fn inspect(text: &str) -> anyhow::Result<Value> {
    match prepare_link(text) {
        Ok(link) => Ok(json!({
            "address": link.address,
            "domain": link.host.as_ref().map(|h| h.domain.as_str()),
            "origin": link.host.as_ref().map(|h| h.origin.as_str()),
            "platform": link.platform.as_str(),
            "type": link.platform.key(),
            "display_name": link.platform.display_name(),
            "capability": link.platform.capability().as_str(),
            "title_dedupe": link.platform.title_dedupe(),
            "share_title": bracket_title(&link.ready_content),
            "ready_content": link.ready_content,
        })),
        Err(e) if e.is_user_error() => Ok(rejection(&e)),
        Err(e) => Err(e.into()),
    }
}

fn rejection(error: &ResolveError) -> Value {
    json!({
        "error": {
            "code": error.code(),
            "message": error.to_string(),
        }
    })
}
