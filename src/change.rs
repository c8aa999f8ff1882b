//! Staging and committing changes in a workspace

use crate::error::{Error, Result};
use crate::types::{Commit, CommitAuthor};
use crate::workspace::Workspace;
use chrono::{TimeZone, Utc};
use git2::{Repository, Signature};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Records an ordered set of staged paths and turns them into one commit
#[derive(Debug)]
pub struct ChangeRecorder<'a> {
    workspace: &'a Workspace,
    staged: Vec<PathBuf>,
}

impl<'a> ChangeRecorder<'a> {
    /// Start recording changes for `workspace`
    pub const fn new(workspace: &'a Workspace) -> Self {
        Self {
            workspace,
            staged: Vec::new(),
        }
    }

    /// Paths staged since the last commit, in staging order
    pub fn staged(&self) -> &[PathBuf] {
        &self.staged
    }

    /// Add one path to the pending change set
    ///
    /// `path` is relative to the workspace root, or absolute inside it.
    /// A tracked file that no longer exists on disk is staged as a deletion.
    pub fn stage(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let relative = self.relative_path(path.as_ref())?;
        let repo = self.workspace.open()?;
        let mut index = repo.index()?;

        if self.workspace.path().join(&relative).is_file() {
            index.add_path(&relative)?;
        } else if index.get_path(&relative, 0).is_some() {
            index.remove_path(&relative)?;
        } else {
            return Err(Error::NotFound(format!(
                "{} in workspace {}",
                relative.display(),
                self.workspace.path().display()
            )));
        }
        index.write()?;

        debug!("Staged {}", relative.display());
        if !self.staged.contains(&relative) {
            self.staged.push(relative);
        }
        Ok(())
    }

    /// Commit the staged paths on the current branch
    ///
    /// Fails with [`Error::NoChanges`] when nothing was staged or when the
    /// staged content matches the parent commit.
    pub fn commit(&mut self, author: &CommitAuthor, message: &str) -> Result<Commit> {
        if self.staged.is_empty() {
            return Err(Error::NoChanges);
        }

        let repo = self.workspace.open()?;
        let mut index = repo.index()?;
        let tree_id = index.write_tree()?;
        let parent = head_commit(&repo)?;

        if parent.as_ref().is_some_and(|p| p.tree_id() == tree_id) {
            debug!("Staged files match HEAD, nothing to commit");
            return Err(Error::NoChanges);
        }

        let tree = repo.find_tree(tree_id)?;
        let signature = Signature::now(&author.name, &author.email)?;
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        let oid = repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;

        let created = repo.find_commit(oid)?;
        let timestamp = Utc
            .timestamp_opt(created.time().seconds(), 0)
            .single()
            .unwrap_or_else(Utc::now);

        info!("Created commit {oid} with {} file(s)", self.staged.len());
        self.staged.clear();

        Ok(Commit {
            id: oid.to_string(),
            author_name: author.name.clone(),
            author_email: author.email.clone(),
            message: message.to_string(),
            timestamp,
        })
    }

    fn relative_path(&self, path: &Path) -> Result<PathBuf> {
        let relative = if path.is_absolute() {
            path.strip_prefix(self.workspace.path())
                .map_err(|_| {
                    Error::Validation(format!(
                        "{} is outside workspace {}",
                        path.display(),
                        self.workspace.path().display()
                    ))
                })?
                .to_path_buf()
        } else {
            path.to_path_buf()
        };

        let normal: PathBuf = relative
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect();

        if normal.as_os_str().is_empty()
            || !normal.components().all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(Error::Validation(format!(
                "{} is not a file path inside the workspace",
                path.display()
            )));
        }
        Ok(normal)
    }
}

fn head_commit(repo: &Repository) -> Result<Option<git2::Commit<'_>>> {
    match repo.head() {
        Ok(head) => Ok(Some(head.peel_to_commit()?)),
        Err(e) if e.code() == git2::ErrorCode::UnbornBranch => Ok(None),
        Err(e) => Err(e.into()),
    }
}
