//! Auth command - test and manage authentication

use crate::cli::style::{Stylize, check};
use anstream::println;
use updatecli_publish::auth::{get_github_auth, get_gitlab_auth, test_github_auth, test_gitlab_auth};
use updatecli_publish::config::WorkflowConfig;
use updatecli_publish::error::{Error, Result};
use updatecli_publish::types::Platform;

/// Run the auth test command
pub async fn run_auth_test(platform: Platform, api_url: Option<&str>) -> Result<()> {
    let timeout = WorkflowConfig::from_env()?.http_timeout;
    match platform {
        Platform::GitHub => {
            println!("Testing GitHub authentication...");
            let config = get_github_auth(timeout).await?;
            let username = test_github_auth(&config, api_url, timeout).await?;
            println!("{} Authenticated as: {}", check(), username.accent());
            println!("{}", format!("Token source: {:?}", config.source).muted());
        }
        Platform::GitLab => {
            println!("Testing GitLab authentication...");
            let config = get_gitlab_auth(None, timeout).await?;
            let username = test_gitlab_auth(&config, api_url, timeout).await?;
            println!("{} Authenticated as: {}", check(), username.accent());
            println!("{}", format!("Token source: {:?}", config.source).muted());
            println!("{}", format!("Host: {}", config.host).muted());
        }
    }
    Ok(())
}

/// Run the auth setup command (show instructions)
pub fn run_auth_setup(platform: Platform) {
    match platform {
        Platform::GitHub => {
            println!("{}", "GitHub Authentication Setup".emphasis());
            println!();
            println!("Option 1: GitHub CLI (recommended)");
            println!("  Install: https://cli.github.com/");
            println!("  Run: {}", "gh auth login".accent());
            println!();
            println!("Option 2: Environment variable");
            println!("  Set {} or {}", "GITHUB_TOKEN".accent(), "GH_TOKEN".accent());
            println!();
            println!("Git push username:");
            println!(
                "  Set {} or let it be read from the token's account",
                "GITHUB_USERNAME".accent()
            );
            println!();
            println!("For GitHub Enterprise:");
            println!("  Set GH_HOST to your instance hostname");
        }
        Platform::GitLab => {
            println!("{}", "GitLab Authentication Setup".emphasis());
            println!();
            println!("Option 1: GitLab CLI (glab)");
            println!("  Install: https://gitlab.com/gitlab-org/cli");
            println!("  Run: {}", "glab auth login".accent());
            println!();
            println!("Option 2: Environment variable");
            println!("  Set {} or {}", "GITLAB_TOKEN".accent(), "GL_TOKEN".accent());
            println!();
            println!("Git push username:");
            println!(
                "  Set {} or let it be read from the token's account",
                "GITLAB_USERNAME".accent()
            );
            println!();
            println!("For self-hosted GitLab:");
            println!("  Set GITLAB_HOST to your instance hostname");
        }
    }
}

/// Wrapper for auth commands
pub async fn run_auth(platform: Platform, action: &str, api_url: Option<&str>) -> Result<()> {
    match action {
        "test" => run_auth_test(platform, api_url).await,
        "setup" => {
            run_auth_setup(platform);
            Ok(())
        }
        _ => Err(Error::Validation(format!(
            "unknown action: {action}. Use 'test' or 'setup'."
        ))),
    }
}
