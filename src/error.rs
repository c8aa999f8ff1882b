//! Error types for updatecli-publish

use thiserror::Error;

/// Errors that can occur while resolving versions or publishing an update
#[derive(Debug, Error)]
pub enum Error {
    /// Transport-level HTTP failure (connection refused, TLS, bad body)
    #[error("network error: {0}")]
    Network(String),

    /// GitHub API returned an error
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// GitLab API returned an error
    #[error("GitLab API error: {0}")]
    GitLabApi(String),

    /// An outbound call did not finish in time
    #[error("timed out: {0}")]
    Timeout(String),

    /// Release, branch, project, or field does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Clone, checkout, stage, commit, or push failed
    #[error("git operation failed: {0}")]
    Git(String),

    /// Caller supplied an invalid combination of inputs
    #[error("invalid input: {0}")]
    Validation(String),

    /// Commit requested with nothing staged, or staged files are unchanged
    #[error("nothing to commit: no staged changes")]
    NoChanges,

    /// Authentication error
    #[error("authentication error: {0}")]
    Auth(String),

    /// Invalid configuration value
    #[error("configuration error: {0}")]
    Config(String),

    /// Could not parse a remote URL or API payload
    #[error("parse error: {0}")]
    Parse(String),

    /// Remote host is neither GitHub nor GitLab
    #[error("unsupported remote host: {0}")]
    UnsupportedHost(String),

    /// Filesystem error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout(
                err.url()
                    .map_or_else(|| "HTTP request".to_string(), |u| format!("request to {}", u.path())),
            );
        }
        Self::Network(err.without_url().to_string())
    }
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        if caused_by_timeout(&err) {
            return Self::Timeout("GitHub API request".to_string());
        }
        match err {
            octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404 => {
                Self::NotFound(source.message)
            }
            other => Self::GitHubApi(other.to_string()),
        }
    }
}

/// Whether any error in the `source()` chain is an I/O timeout
///
/// octocrab surfaces its connect/read deadlines as a `TimedOut` I/O error
/// buried under hyper's wrappers.
pub(crate) fn caused_by_timeout(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.downcast_ref::<std::io::Error>()
            .is_some_and(|io| io.kind() == std::io::ErrorKind::TimedOut)
        {
            return true;
        }
        current = e.source();
    }
    false
}

impl From<git2::Error> for Error {
    fn from(err: git2::Error) -> Self {
        Self::Git(err.message().to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[derive(Debug, thiserror::Error)]
    #[error("request failed")]
    struct Wrapper(#[source] io::Error);

    #[test]
    fn test_caused_by_timeout_walks_source_chain() {
        let wrapped = Wrapper(io::Error::new(io::ErrorKind::TimedOut, "deadline"));
        assert!(caused_by_timeout(&wrapped));

        let refused = Wrapper(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        assert!(!caused_by_timeout(&refused));
    }
}
