//! Platform services for GitHub and GitLab
//!
//! Provides a unified interface for release and PR/MR operations across
//! platforms. Git transport and local repository work are host-independent
//! and live in [`crate::workspace`], [`crate::branch`] and [`crate::change`].

mod detection;
mod factory;
mod github;
mod gitlab;

pub use detection::{detect_platform, ensure_valid_url, parse_repo_info};
pub use factory::create_scm_client;
pub use github::GitHubService;
pub use gitlab::GitLabService;

use crate::error::Result;
use crate::types::{NewPullRequest, Platform, PullRequest, Release, RepositoryIdentity};
use async_trait::async_trait;

/// Page size requested from paginated list endpoints
pub(crate) const PER_PAGE: usize = 100;

/// Host API operations needed by the publication workflow
///
/// This trait abstracts GitHub and GitLab, allowing the same resolve and
/// publish logic to work with either platform.
#[async_trait]
pub trait ScmClient: Send + Sync {
    /// Which host backend this is
    fn platform(&self) -> Platform;

    /// Repository this client talks to
    fn identity(&self) -> &RepositoryIdentity;

    /// Fetch a single release by selector (`latest`, a release id, or a tag)
    async fn get_release(&self, selector: &str) -> Result<Release>;

    /// List every release of the repository, newest first
    async fn list_releases(&self) -> Result<Vec<Release>>;

    /// List open pull/merge requests
    async fn list_open_requests(&self) -> Result<Vec<PullRequest>>;

    /// Open a new pull/merge request
    async fn create_request(&self, request: &NewPullRequest) -> Result<PullRequest>;
}
