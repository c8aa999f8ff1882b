//! Authentication for GitHub and GitLab
//!
//! Supports CLI-based auth (gh, glab) and environment variables. Git
//! transport needs a username alongside the token; it is taken from
//! `GITHUB_USERNAME` / `GITLAB_USERNAME` when set, otherwise from the account
//! the token belongs to.

mod github;
mod gitlab;

pub use github::{GitHubAuthConfig, get_github_auth, test_github_auth};
pub use gitlab::{GitLabAuthConfig, get_gitlab_auth, test_gitlab_auth};

use crate::error::Result;
use crate::types::{Credentials, Platform, RepositoryIdentity};
use std::env;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from CLI tool (gh or glab)
    Cli,
    /// Token from environment variable
    EnvVar,
}

/// Resolve transport and API credentials for `identity`
///
/// `api_url` is the GitHub API base or the GitLab instance URL, when it
/// differs from what the identity's host implies. `timeout` bounds every CLI
/// helper and API call made along the way.
pub async fn resolve_credentials(
    platform: Platform,
    identity: &RepositoryIdentity,
    api_url: Option<&str>,
    timeout: Duration,
) -> Result<Credentials> {
    match platform {
        Platform::GitHub => {
            let config = get_github_auth(timeout).await?;
            debug!("GitHub token from {:?}", config.source);
            let username = match username_from_env("GITHUB_USERNAME") {
                Some(name) => name,
                None => {
                    let enterprise = (identity.host != "github.com")
                        .then(|| format!("https://{}/api/v3", identity.host));
                    test_github_auth(&config, api_url.or(enterprise.as_deref()), timeout).await?
                }
            };
            Ok(Credentials::new(username, config.token))
        }
        Platform::GitLab => {
            let config = get_gitlab_auth(Some(&identity.host), timeout).await?;
            debug!("GitLab token from {:?}", config.source);
            let username = match username_from_env("GITLAB_USERNAME") {
                Some(name) => name,
                None => test_gitlab_auth(&config, api_url, timeout).await?,
            };
            Ok(Credentials::new(username, config.token))
        }
    }
}

fn username_from_env(var: &str) -> Option<String> {
    env::var(var).ok().filter(|name| !name.trim().is_empty())
}

/// Run an auth helper (`gh`, `glab`) and return its output if it succeeded
///
/// A missing binary, a failure exit, or a run longer than `timeout` all
/// yield `None`; the child is killed when the deadline passes.
async fn run_cli(program: &str, args: &[&str], timeout: Duration) -> Option<Output> {
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .ok()?;

    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) if output.status.success() => Some(output),
        Ok(_) => None,
        Err(_) => {
            warn!("{program} {} timed out after {}s", args.join(" "), timeout.as_secs());
            None
        }
    }
}

/// Trimmed stdout of a successful helper run, if non-empty
async fn cli_token(program: &str, args: &[&str], timeout: Duration) -> Option<String> {
    let output = run_cli(program, args, timeout).await?;
    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() { None } else { Some(token) }
}
