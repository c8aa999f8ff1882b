//! Pushing the update branch

use crate::branch::{BRANCH_PREFIX, Branch};
use crate::error::Result;
use crate::git::run_git;
use crate::types::Credentials;
use crate::workspace::Workspace;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Push `branch` to the workspace's repository over authenticated HTTPS
///
/// The push goes through a throwaway remote that is removed afterwards, so
/// credentials never stay in the repository configuration. Never forces.
pub async fn push_branch(
    workspace: &Workspace,
    credentials: &Credentials,
    branch: &Branch,
    timeout: Duration,
) -> Result<()> {
    let url = workspace.identity().transport_url(credentials);
    push_to(workspace, &url, &credentials.token, branch, timeout).await
}

pub(crate) async fn push_to(
    workspace: &Workspace,
    url: &str,
    secret: &str,
    branch: &Branch,
    timeout: Duration,
) -> Result<()> {
    let remote_name = format!("{BRANCH_PREFIX}-{}", Uuid::new_v4().simple());
    let repo = workspace.open()?;
    repo.remote(&remote_name, url)?;
    debug!("Registered temporary remote {remote_name}");

    let refspec = format!("refs/heads/{0}:refs/heads/{0}", branch.name);
    let pushed = run_git(
        &["push", "--porcelain", &remote_name, &refspec],
        workspace.path(),
        timeout,
        secret,
    )
    .await;

    if let Err(e) = repo.remote_delete(&remote_name) {
        warn!("Failed to remove temporary remote {remote_name}: {}", e.message());
    }

    pushed?;
    info!("Pushed {} to {}", branch.name, workspace.identity());
    Ok(())
}
