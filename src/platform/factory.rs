//! Platform service factory
//!
//! Creates platform services based on configuration.

use crate::error::Result;
use crate::platform::{GitHubService, GitLabService, ScmClient};
use crate::types::{Credentials, Platform, RepositoryIdentity};
use std::time::Duration;

/// Create a platform service for `identity`
///
/// `api_url` overrides the API endpoint (GitHub) or instance URL (GitLab).
/// When absent, GitLab uses the identity's host.
pub fn create_scm_client(
    platform: Platform,
    identity: RepositoryIdentity,
    api_url: Option<String>,
    credentials: &Credentials,
    timeout: Duration,
) -> Result<Box<dyn ScmClient>> {
    match platform {
        Platform::GitHub => Ok(Box::new(GitHubService::new(
            &credentials.token,
            identity,
            api_url,
            timeout,
        )?)),
        Platform::GitLab => {
            let url = api_url.unwrap_or_else(|| identity.host.clone());
            Ok(Box::new(GitLabService::new(
                credentials.token.clone(),
                identity,
                &url,
                timeout,
            )?))
        }
    }
}
