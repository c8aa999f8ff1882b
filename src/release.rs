//! Release lookup and matching
//!
//! Decides which upstream version to publish and whether a release for a
//! given tag exists.

use crate::error::{Error, Result};
use crate::platform::ScmClient;
use crate::types::Release;
use tracing::{info, warn};

/// Outcome of matching a tag against a repository's releases
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseMatch {
    /// A release with exactly this tag exists
    Found(String),
    /// The repository has no releases at all
    NoReleases,
    /// Releases exist, none with this tag
    NoMatch,
}

impl ReleaseMatch {
    /// Whether a release was found
    pub const fn is_match(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Resolve the release name for `selector` (`latest`, a release id, or a tag)
///
/// A release without a name is reported as [`Error::NotFound`].
pub async fn resolve_version(client: &dyn ScmClient, selector: &str) -> Result<String> {
    let release = client.get_release(selector).await?;

    match release.name.filter(|n| !n.trim().is_empty()) {
        Some(name) => {
            info!("Resolved {selector} release of {} to {name}", client.identity());
            Ok(name)
        }
        None => Err(Error::NotFound(format!(
            "name of {selector} release ({}) in {}",
            release.tag,
            client.identity()
        ))),
    }
}

/// Check whether a release tagged `target_tag` exists
///
/// An empty `target_tag` falls back to `fallback_tag` (usually the version
/// produced by an earlier source step).
pub async fn match_release(
    client: &dyn ScmClient,
    target_tag: &str,
    fallback_tag: &str,
) -> Result<ReleaseMatch> {
    let tag = if target_tag.is_empty() {
        fallback_tag
    } else {
        target_tag
    };
    if tag.is_empty() {
        return Err(Error::Validation(
            "no release tag given and no fallback version available".to_string(),
        ));
    }

    let releases = client.list_releases().await?;
    let outcome = match_release_tag(&releases, tag);

    match &outcome {
        ReleaseMatch::Found(found) => {
            info!("Release tag {found:?} found in {}", client.identity());
        }
        ReleaseMatch::NoReleases => {
            warn!(
                "No release found in {}; you may be looking for a git tag",
                client.identity()
            );
        }
        ReleaseMatch::NoMatch => {
            info!("No release tag matching {tag:?} in {}", client.identity());
        }
    }

    Ok(outcome)
}

/// Find `tag` in `releases` by exact comparison
pub fn match_release_tag(releases: &[Release], tag: &str) -> ReleaseMatch {
    if releases.is_empty() {
        return ReleaseMatch::NoReleases;
    }

    releases
        .iter()
        .find(|r| r.tag == tag)
        .map_or(ReleaseMatch::NoMatch, |r| ReleaseMatch::Found(r.tag.clone()))
}
