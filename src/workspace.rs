//! Local workspaces keyed by repository identity and version
//!
//! A workspace lives at `root/owner/name/version`. Provisioning is idempotent:
//! an existing directory is reused as-is, and a directory that already holds a
//! complete clone is never cloned again. Leftovers of an interrupted clone are
//! wiped and the clone is retried.

use crate::error::{Error, Result};
use crate::git::run_git;
use crate::types::{Credentials, RepositoryIdentity};
use git2::Repository;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Result of [`Workspace::clone_repository`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneStatus {
    /// A fresh clone was made
    Cloned,
    /// The directory already held a repository; nothing was fetched
    AlreadyCloned,
}

/// A local checkout dedicated to one (repository, version) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    identity: RepositoryIdentity,
    version: String,
    path: PathBuf,
}

impl Workspace {
    /// Compute the workspace path without touching the filesystem
    pub fn path_for(root: &Path, identity: &RepositoryIdentity, version: &str) -> Result<PathBuf> {
        let mut path = root.to_path_buf();
        for (label, value) in [
            ("owner", identity.owner.as_str()),
            ("repository name", identity.name.as_str()),
            ("version", version),
        ] {
            path.push(checked_segment(label, value)?);
        }
        Ok(path)
    }

    /// Create (or reuse) the workspace directory for `identity` at `version`
    pub fn provision(root: &Path, identity: &RepositoryIdentity, version: &str) -> Result<Self> {
        let path = Self::path_for(root, identity, version)?;

        if path.is_dir() {
            debug!("Reusing workspace {}", path.display());
        } else {
            fs::create_dir_all(&path)?;
            debug!("Created workspace {}", path.display());
        }

        Ok(Self {
            identity: identity.clone(),
            version: version.to_string(),
            path,
        })
    }

    /// Repository this workspace belongs to
    pub const fn identity(&self) -> &RepositoryIdentity {
        &self.identity
    }

    /// Version this workspace was provisioned for
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Workspace directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the directory holds a completed clone
    ///
    /// A repository without an `origin` remote, or with neither a checked
    /// out commit nor `origin/HEAD`, is what an interrupted clone leaves.
    pub fn is_cloned(&self) -> bool {
        let Ok(repo) = Repository::open(&self.path) else {
            return false;
        };
        repo.find_remote("origin").is_ok()
            && (repo.head().is_ok() || repo.find_reference("refs/remotes/origin/HEAD").is_ok())
    }

    /// Open the repository in this workspace
    pub fn open(&self) -> Result<Repository> {
        Repository::open(&self.path).map_err(|e| {
            Error::Git(format!(
                "workspace {} is not a repository: {}",
                self.path.display(),
                e.message()
            ))
        })
    }

    /// Clone the repository over HTTPS unless the workspace already holds it
    pub async fn clone_repository(
        &self,
        credentials: &Credentials,
        timeout: Duration,
    ) -> Result<CloneStatus> {
        let url = self.identity.transport_url(credentials);
        self.clone_from(&url, &credentials.token, timeout).await
    }

    pub(crate) async fn clone_from(
        &self,
        url: &str,
        secret: &str,
        timeout: Duration,
    ) -> Result<CloneStatus> {
        if self.is_cloned() {
            debug!("{} already cloned in {}", self.identity, self.path.display());
            return Ok(CloneStatus::AlreadyCloned);
        }

        if self.path.join(".git").exists() {
            warn!("Discarding incomplete clone in {}", self.path.display());
            self.clear()?;
        } else if !is_empty_dir(&self.path)? {
            return Err(Error::Validation(format!(
                "workspace {} is not empty and holds no repository",
                self.path.display()
            )));
        }

        fs::create_dir_all(&self.path)?;
        if let Err(e) = run_git(&["clone", "--quiet", url, "."], &self.path, timeout, secret).await
        {
            self.clear()?;
            return Err(e);
        }

        // Keep the token out of .git/config
        let repo = self.open()?;
        repo.remote_set_url("origin", &self.identity.public_url())?;

        info!("Cloned {} into {}", self.identity, self.path.display());
        Ok(CloneStatus::Cloned)
    }

    /// Empty the workspace directory, keeping the directory itself
    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_dir_all(&self.path)?;
        }
        fs::create_dir_all(&self.path)?;
        Ok(())
    }

    /// Remove the workspace directory and everything in it
    pub fn cleanup(&self) -> Result<()> {
        match fs::remove_dir_all(&self.path) {
            Ok(()) => {
                info!("Removed workspace {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Validate one user-supplied path segment (may contain `/` for nested groups)
fn checked_segment<'a>(label: &str, value: &'a str) -> Result<&'a Path> {
    let path = Path::new(value);
    let valid = !value.trim().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_)));

    if valid {
        Ok(path)
    } else {
        Err(Error::Validation(format!(
            "{label} {value:?} cannot be used as a workspace path segment"
        )))
    }
}

fn is_empty_dir(path: &Path) -> Result<bool> {
    match fs::read_dir(path) {
        Ok(mut entries) => Ok(entries.next().is_none()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
        Err(e) => Err(e.into()),
    }
}
