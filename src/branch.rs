//! Update branch management
//!
//! Branch names are derived from the version alone (`updatecli/<version>`), so
//! re-running a publication for the same version lands on the same branch.
//! An existing branch is reused rather than recreated: the local one first,
//! then the one an earlier run pushed to origin.

use crate::error::{Error, Result};
use crate::workspace::Workspace;
use git2::build::CheckoutBuilder;
use git2::{BranchType, Commit, Reference, Repository};
use tracing::{debug, info};

/// Prefix of every update branch
pub const BRANCH_PREFIX: &str = "updatecli";

/// An update branch checked out in a workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    /// Local (and remote) branch name
    pub name: String,
    /// Branch the update will be merged into
    pub base: String,
}

/// Name of the update branch for `version`
pub fn branch_name(version: &str) -> String {
    format!("{BRANCH_PREFIX}/{version}")
}

/// Check out the update branch for `version`
///
/// Starts from the local branch if present, else from `origin/<branch>`,
/// else from `base`. Continuing from the pushed branch keeps later pushes
/// fast-forward after a workspace was recreated.
///
/// Uncommitted and untracked files in the workspace are kept across the
/// switch; a checkout that would overwrite them fails instead.
pub fn checkout_update_branch(workspace: &Workspace, version: &str, base: &str) -> Result<Branch> {
    let name = branch_name(version);
    let refname = format!("refs/heads/{name}");
    if !Reference::is_valid_name(&refname) {
        return Err(Error::Validation(format!(
            "version {version:?} does not produce a valid branch name"
        )));
    }

    let repo = workspace.open()?;

    if current_branch_ref(&repo).as_deref() == Some(refname.as_str()) {
        debug!("Already on {name}");
        return Ok(Branch {
            name,
            base: base.to_string(),
        });
    }

    let target = match repo.find_branch(&name, BranchType::Local) {
        Ok(existing) => {
            info!("Reusing existing branch {name}");
            existing.get().peel_to_commit()?
        }
        Err(e) if e.code() == git2::ErrorCode::NotFound => {
            let start = match repo.find_reference(&format!("refs/remotes/origin/{name}")) {
                Ok(pushed) => {
                    info!("Continuing {name} from origin");
                    pushed.peel_to_commit()?
                }
                Err(_) => {
                    info!("Created branch {name} from {base}");
                    base_commit(&repo, base)?
                }
            };
            repo.branch(&name, &start, false)?;
            start
        }
        Err(e) => return Err(e.into()),
    };

    let mut checkout = CheckoutBuilder::new();
    checkout.safe();
    repo.checkout_tree(target.as_object(), Some(&mut checkout))?;
    repo.set_head(&refname)?;

    Ok(Branch {
        name,
        base: base.to_string(),
    })
}

/// Default branch of the workspace's origin
///
/// Reads `origin/HEAD`; falls back to the currently checked out branch.
pub fn default_branch(workspace: &Workspace) -> Result<String> {
    let repo = workspace.open()?;

    if let Ok(origin_head) = repo.find_reference("refs/remotes/origin/HEAD") {
        if let Some(name) = origin_head
            .symbolic_target()
            .and_then(|t| t.strip_prefix("refs/remotes/origin/"))
        {
            return Ok(name.to_string());
        }
    }

    repo.head()
        .ok()
        .and_then(|head| head.shorthand().map(String::from))
        .filter(|name| !name.starts_with(&format!("{BRANCH_PREFIX}/")))
        .ok_or_else(|| {
            Error::NotFound(format!(
                "cannot determine default branch in {}",
                workspace.path().display()
            ))
        })
}

/// Number of commits on `branch` that are not on its base
pub fn commits_ahead(workspace: &Workspace, branch: &Branch) -> Result<usize> {
    let repo = workspace.open()?;
    let local = repo
        .find_reference(&format!("refs/heads/{}", branch.name))?
        .peel_to_commit()?
        .id();
    let base = base_commit(&repo, &branch.base)?.id();
    let (ahead, _behind) = repo.graph_ahead_behind(local, base)?;
    Ok(ahead)
}

fn current_branch_ref(repo: &Repository) -> Option<String> {
    repo.head()
        .ok()
        .filter(Reference::is_branch)
        .and_then(|head| head.name().map(String::from))
}

fn base_commit<'r>(repo: &'r Repository, base: &str) -> Result<Commit<'r>> {
    let candidates = [
        format!("refs/remotes/origin/{base}"),
        format!("refs/heads/{base}"),
    ];

    for candidate in &candidates {
        if let Ok(reference) = repo.find_reference(candidate) {
            return Ok(reference.peel_to_commit()?);
        }
    }

    Err(Error::NotFound(format!("base branch {base}")))
}
