//! CLI commands
//!
//! Command implementations for the `updatecli-publish` binary.

mod auth;
mod branch;
mod progress;
mod publish;
mod release;
mod style;

pub use auth::run_auth;
pub use branch::run_branch_exists;
pub use publish::{run_clean, run_prepare, run_publish};
pub use release::{run_release_match, run_release_resolve};

use git2::Repository;
use std::path::PathBuf;
use updatecli_publish::auth::resolve_credentials;
use updatecli_publish::config::WorkflowConfig;
use updatecli_publish::error::{Error, Result};
use updatecli_publish::platform::{ScmClient, create_scm_client, parse_repo_info};
use updatecli_publish::types::{Credentials, Platform, RepositoryIdentity};

/// Repository and settings selected by the global flags
pub struct Target {
    /// `--repo`
    pub repo: Option<String>,
    /// `--api-url`
    pub api_url: Option<String>,
    /// `--workspace-root`
    pub workspace_root: Option<PathBuf>,
}

/// Authenticated client plus the settings a command runs with
pub struct Connection {
    /// Host API client
    pub client: Box<dyn ScmClient>,
    /// Transport credentials
    pub credentials: Credentials,
    /// Workflow settings
    pub config: WorkflowConfig,
}

impl Target {
    /// Platform and identity of the target repository
    pub fn identify(&self) -> Result<(Platform, RepositoryIdentity)> {
        let url = match &self.repo {
            Some(url) => url.clone(),
            None => origin_url()?,
        };
        parse_repo_info(&url)
    }

    /// Environment configuration with CLI overrides applied
    pub fn config(&self) -> Result<WorkflowConfig> {
        let mut config = WorkflowConfig::from_env()?;
        if let Some(root) = &self.workspace_root {
            config.workspace_root.clone_from(root);
        }
        Ok(config)
    }

    /// Resolve credentials and build a host client
    pub async fn connect(&self) -> Result<Connection> {
        let (platform, identity) = self.identify()?;
        let config = self.config()?;
        let credentials = resolve_credentials(
            platform,
            &identity,
            self.api_url.as_deref(),
            config.http_timeout,
        )
        .await?;
        let client = create_scm_client(
            platform,
            identity,
            self.api_url.clone(),
            &credentials,
            config.http_timeout,
        )?;

        Ok(Connection {
            client,
            credentials,
            config,
        })
    }
}

/// URL of `origin` in the repository containing the current directory
fn origin_url() -> Result<String> {
    let repo = Repository::discover(".").map_err(|_| {
        Error::Config("not inside a git repository; pass --repo <url>".to_string())
    })?;
    let origin = repo
        .find_remote("origin")
        .map_err(|_| Error::Config("no origin remote; pass --repo <url>".to_string()))?;
    origin
        .url()
        .map(String::from)
        .ok_or_else(|| Error::Config("origin remote URL is not valid UTF-8".to_string()))
}

/// Parse a `SRC=DEST` copy specification
pub fn parse_copy(value: &str) -> std::result::Result<(PathBuf, PathBuf), String> {
    match value.split_once('=') {
        Some((src, dest)) if !src.is_empty() && !dest.is_empty() => {
            Ok((PathBuf::from(src), PathBuf::from(dest)))
        }
        _ => Err(format!("expected SRC=DEST, got {value:?}")),
    }
}
