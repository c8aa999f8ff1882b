//! GitLab authentication

use crate::auth::{AuthSource, cli_token, run_cli};
use crate::error::{Error, Result};
use crate::platform::ensure_valid_url;
use reqwest::Client;
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// GitLab authentication configuration
#[derive(Debug, Clone)]
pub struct GitLabAuthConfig {
    /// Authentication token
    pub token: String,
    /// Where the token was obtained from
    pub source: AuthSource,
    /// GitLab host (e.g., "gitlab.com")
    pub host: String,
}

/// Get GitLab authentication
///
/// Priority:
/// 1. glab CLI (`glab auth token`)
/// 2. `GITLAB_TOKEN` environment variable
/// 3. `GL_TOKEN` environment variable
pub async fn get_gitlab_auth(host: Option<&str>, timeout: Duration) -> Result<GitLabAuthConfig> {
    let host = host
        .map(String::from)
        .or_else(|| env::var("GITLAB_HOST").ok())
        .unwrap_or_else(|| "gitlab.com".to_string());

    if let Some(token) = get_glab_cli_token(&host, timeout).await {
        return Ok(GitLabAuthConfig {
            token,
            source: AuthSource::Cli,
            host,
        });
    }

    for var in ["GITLAB_TOKEN", "GL_TOKEN"] {
        if let Some(token) = env::var(var).ok().filter(|t| !t.is_empty()) {
            return Ok(GitLabAuthConfig {
                token,
                source: AuthSource::EnvVar,
                host,
            });
        }
    }

    Err(Error::Auth(
        "No GitLab authentication found. Run `glab auth login` or set GITLAB_TOKEN".to_string(),
    ))
}

async fn get_glab_cli_token(host: &str, timeout: Duration) -> Option<String> {
    run_cli("glab", &["auth", "status", "--hostname", host], timeout).await?;
    cli_token("glab", &["auth", "token", "--hostname", host], timeout).await
}

#[derive(Deserialize)]
struct GitLabUser {
    username: String,
}

/// Test GitLab authentication and return the account username
///
/// `instance` is the instance URL or bare host; defaults to the configured host.
pub async fn test_gitlab_auth(
    config: &GitLabAuthConfig,
    instance: Option<&str>,
    timeout: Duration,
) -> Result<String> {
    let base = ensure_valid_url(instance.unwrap_or(&config.host));
    let url = format!("{}/api/v4/user", base.trim_end_matches('/'));

    let client = Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .build()
        .map_err(|e| Error::GitLabApi(e.to_string()))?;

    let user: GitLabUser = client
        .get(&url)
        .header("PRIVATE-TOKEN", &config.token)
        .send()
        .await?
        .error_for_status()
        .map_err(|e| Error::Auth(format!("Invalid token: {}", e.without_url())))?
        .json()
        .await?;

    Ok(user.username)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::silent_server;

    const TIMEOUT: Duration = Duration::from_secs(10);

    fn config() -> GitLabAuthConfig {
        GitLabAuthConfig {
            token: "glpat-test".to_string(),
            source: AuthSource::EnvVar,
            host: "gitlab.example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_gitlab_auth_returns_username() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v4/user")
            .match_header("private-token", "glpat-test")
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":7,"username":"release-bot"}"#)
            .create_async()
            .await;

        let username = test_gitlab_auth(&config(), Some(server.url().as_str()), TIMEOUT).await.unwrap();
        assert_eq!(username, "release-bot");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_gitlab_auth_rejects_bad_token() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v4/user")
            .with_status(401)
            .create_async()
            .await;

        let err = test_gitlab_auth(&config(), Some(server.url().as_str()), TIMEOUT).await.unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
    }

    #[tokio::test]
    async fn test_gitlab_auth_times_out_on_silent_server() {
        let url = silent_server().await;

        let err = test_gitlab_auth(&config(), Some(url.as_str()), Duration::from_millis(300))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout(_)), "got {err:?}");
    }
}
