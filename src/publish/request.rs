//! Idempotent pull/merge request creation
//!
//! The request title is derived from the version and doubles as the
//! deduplication key: if an open request with that exact title exists, the
//! update is considered published already.

use crate::error::Result;
use crate::platform::ScmClient;
use crate::types::{NewPullRequest, PublicationResult, PullRequest};
use tracing::info;

/// Title prefix of every update request
pub const REQUEST_TITLE_PREFIX: &str = "[Updatecli] Bump to version";

/// Title of the update request for `version`
pub fn request_title(version: &str) -> String {
    format!("{REQUEST_TITLE_PREFIX} {version}")
}

/// Find a request whose title is exactly `title`
pub fn find_request_by_title<'a>(requests: &'a [PullRequest], title: &str) -> Option<&'a PullRequest> {
    requests.iter().find(|pr| pr.title == title)
}

/// Make sure exactly one open request exists for `version`
///
/// Returns the existing request without any mutating call when one is found.
pub async fn ensure_request(
    client: &dyn ScmClient,
    version: &str,
    head: &str,
    base: &str,
    body: &str,
) -> Result<PublicationResult> {
    let title = request_title(version);
    let open = client.list_open_requests().await?;

    if let Some(existing) = find_request_by_title(&open, &title) {
        info!(
            "Request #{} already open for {} ({})",
            existing.number,
            client.identity(),
            existing.html_url
        );
        return Ok(PublicationResult {
            already_existed: true,
            request: existing.clone(),
        });
    }

    let request = client
        .create_request(&NewPullRequest {
            title,
            body: body.to_string(),
            head: head.to_string(),
            base: base.to_string(),
        })
        .await?;

    info!(
        "Opened request #{} on {} ({})",
        request.number,
        client.identity(),
        request.html_url
    );

    Ok(PublicationResult {
        already_existed: false,
        request,
    })
}
