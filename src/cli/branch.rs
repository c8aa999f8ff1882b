//! Branch-exists command - query a remote branch without a workspace

use crate::cli::Target;
use crate::cli::style::{Stylize, check, cross};
use anstream::println;
use updatecli_publish::auth::get_gitlab_auth;
use updatecli_publish::error::{Error, Result};
use updatecli_publish::platform::GitLabService;
use updatecli_publish::types::Platform;

/// Run the branch-exists command
///
/// Prints whether `branch` exists; a missing branch is not an error.
pub async fn run_branch_exists(target: &Target, branch: &str) -> Result<()> {
    let (platform, identity) = target.identify()?;
    if platform != Platform::GitLab {
        return Err(Error::Validation(format!(
            "branch-exists is only supported for GitLab, {identity} is on {platform}"
        )));
    }

    let config = target.config()?;
    // Only the token is needed; no username lookup
    let auth = get_gitlab_auth(Some(&identity.host), config.http_timeout).await?;
    let instance = target
        .api_url
        .clone()
        .unwrap_or_else(|| identity.host.clone());
    let service = GitLabService::new(auth.token, identity, &instance, config.http_timeout)?;

    if service.branch_exists(branch).await? {
        println!("{} Branch {} exists", check(), branch.accent());
    } else {
        println!("{} Branch {} does not exist", cross().for_stdout(), branch.accent());
    }
    Ok(())
}
