//! Platform detection from remote URLs

use crate::error::{Error, Result};
use crate::types::{Platform, RepositoryIdentity};
use regex::Regex;
use std::env;
use std::sync::LazyLock;

/// Default GitLab instance
pub const GITLAB_DOMAIN: &str = "gitlab.com";

static SSH_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@/]+@[^:]+:(.+?)(?:\.git)?/?$").expect("valid regex"));
static HTTPS_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^/]+/(.+?)(?:\.git)?/?$").expect("valid regex"));

/// Detect platform (GitHub or GitLab) from a remote URL
///
/// `GH_HOST` and `GITLAB_HOST` add one self-hosted instance each.
pub fn detect_platform(url: &str) -> Option<Platform> {
    extract_hostname(url).and_then(|host| platform_for_host(&host))
}

fn platform_for_host(host: &str) -> Option<Platform> {
    let matches = |public: &str, var: &str| {
        host == public
            || host.ends_with(&format!(".{public}"))
            || env::var(var).is_ok_and(|configured| configured == host)
    };

    if matches("github.com", "GH_HOST") {
        Some(Platform::GitHub)
    } else if matches(GITLAB_DOMAIN, "GITLAB_HOST") {
        Some(Platform::GitLab)
    } else {
        None
    }
}

/// Parse platform and repository identity from a remote URL
///
/// Accepts `git@host:owner/name.git` and `https://host/owner/name(.git)`.
/// Everything before the last path segment is the owner, so nested GitLab
/// groups are kept intact.
pub fn parse_repo_info(url: &str) -> Result<(Platform, RepositoryIdentity)> {
    let unparseable = || Error::Parse(format!("cannot parse remote URL: {url}"));

    let host = extract_hostname(url).ok_or_else(unparseable)?;
    let platform = platform_for_host(&host).ok_or_else(|| Error::UnsupportedHost(host.clone()))?;

    let path = SSH_PATH
        .captures(url)
        .or_else(|| HTTPS_PATH.captures(url))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(unparseable)?;

    match path.rsplit_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() => {
            Ok((platform, RepositoryIdentity::new(host, owner, name)))
        }
        _ => Err(Error::Parse(format!("invalid repo path: {path}"))),
    }
}

/// Normalize a GitLab instance URL
///
/// An empty value means gitlab.com; a bare hostname gets an `https://` scheme.
pub fn ensure_valid_url(url: &str) -> String {
    let url = if url.is_empty() { GITLAB_DOMAIN } else { url };

    if url.starts_with("https://") || url.starts_with("http://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

fn extract_hostname(url: &str) -> Option<String> {
    if let Some(rest) = url.strip_prefix("git@") {
        return rest.split(':').next().map(ToString::to_string);
    }

    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(ToString::to_string))
}
