//! GitHub authentication

use crate::auth::{AuthSource, cli_token, run_cli};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// GitHub authentication configuration
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// Authentication token
    pub token: String,
    /// Where the token was obtained from
    pub source: AuthSource,
}

/// Get GitHub authentication
///
/// Priority:
/// 1. gh CLI (`gh auth token`)
/// 2. `GITHUB_TOKEN` environment variable
/// 3. `GH_TOKEN` environment variable
///
/// Each `gh` invocation is bounded by `timeout`.
pub async fn get_github_auth(timeout: Duration) -> Result<GitHubAuthConfig> {
    if let Some(token) = get_gh_cli_token(timeout).await {
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::Cli,
        });
    }

    for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
        if let Some(token) = env::var(var).ok().filter(|t| !t.is_empty()) {
            return Ok(GitHubAuthConfig {
                token,
                source: AuthSource::EnvVar,
            });
        }
    }

    Err(Error::Auth(
        "No GitHub authentication found. Run `gh auth login` or set GITHUB_TOKEN".to_string(),
    ))
}

async fn get_gh_cli_token(timeout: Duration) -> Option<String> {
    run_cli("gh", &["auth", "status"], timeout).await?;
    cli_token("gh", &["auth", "token"], timeout).await
}

#[derive(Deserialize)]
struct GitHubUser {
    login: String,
}

/// Test GitHub authentication and return the account login
///
/// `api_url` points at a GitHub Enterprise API; `None` means github.com.
pub async fn test_github_auth(
    config: &GitHubAuthConfig,
    api_url: Option<&str>,
    timeout: Duration,
) -> Result<String> {
    let mut builder = octocrab::Octocrab::builder()
        .personal_token(config.token.clone())
        .set_connect_timeout(Some(timeout))
        .set_read_timeout(Some(timeout))
        .set_write_timeout(Some(timeout));
    if let Some(url) = api_url {
        builder = builder
            .base_uri(url)
            .map_err(|e| Error::GitHubApi(e.to_string()))?;
    }
    let octocrab = builder.build().map_err(|e| Error::GitHubApi(e.to_string()))?;

    // Deadline on the whole request, not only on individual socket reads
    let user: GitHubUser = tokio::time::timeout(timeout, octocrab.get("/user", None::<&()>))
        .await
        .map_err(|_| Error::Timeout("GitHub /user".to_string()))?
        .map_err(|e| match Error::from(e) {
            elapsed @ Error::Timeout(_) => elapsed,
            other => Error::Auth(format!("Invalid token: {other}")),
        })?;

    Ok(user.login)
}
