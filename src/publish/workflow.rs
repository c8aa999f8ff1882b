//! End-to-end publication workflow
//!
//! `prepare` hands back a workspace on the update branch; the caller writes
//! its edits there and then calls `publish` with the paths to stage. Each step
//! aborts the run on failure. Nothing is rolled back: a failed push leaves the
//! local commit in place for the next run.

use crate::branch::{Branch, checkout_update_branch, commits_ahead, default_branch};
use crate::change::ChangeRecorder;
use crate::config::WorkflowConfig;
use crate::error::{Error, Result};
use crate::platform::ScmClient;
use crate::publish::push::push_branch;
use crate::publish::request::ensure_request;
use crate::publish::{Phase, ProgressCallback, PushStatus};
use crate::types::{Commit, Credentials, PublicationResult};
use crate::workspace::{CloneStatus, Workspace};
use std::path::{Path, PathBuf};
use tracing::info;

/// A workspace checked out on its update branch
#[derive(Debug, Clone)]
pub struct PreparedWorkspace {
    /// The workspace
    pub workspace: Workspace,
    /// Update branch checked out in it
    pub branch: Branch,
    /// Whether this run cloned the repository
    pub clone_status: CloneStatus,
}

impl PreparedWorkspace {
    /// Workspace directory, where caller edits go
    pub fn path(&self) -> &Path {
        self.workspace.path()
    }
}

/// What a publication produced
#[derive(Debug, Clone)]
pub struct PublicationOutcome {
    /// Workspace directory
    pub workspace_path: PathBuf,
    /// Commit created by this run; `None` when the branch already carried it
    pub commit: Option<Commit>,
    /// Existing or created request
    pub result: PublicationResult,
}

/// One publication against one repository
pub struct Publication<'a> {
    client: &'a dyn ScmClient,
    credentials: &'a Credentials,
    config: &'a WorkflowConfig,
    progress: &'a dyn ProgressCallback,
}

impl<'a> Publication<'a> {
    /// Create a publication for the repository behind `client`
    pub const fn new(
        client: &'a dyn ScmClient,
        credentials: &'a Credentials,
        config: &'a WorkflowConfig,
        progress: &'a dyn ProgressCallback,
    ) -> Self {
        Self {
            client,
            credentials,
            config,
            progress,
        }
    }

    /// Provision, clone if needed, and check out the update branch
    ///
    /// `base` defaults to the remote's default branch.
    pub async fn prepare(&self, version: &str, base: Option<&str>) -> Result<PreparedWorkspace> {
        self.progress.on_phase(Phase::Provisioning).await;
        let workspace =
            Workspace::provision(&self.config.workspace_root, self.client.identity(), version)?;

        self.progress.on_phase(Phase::Cloning).await;
        let clone_status = workspace
            .clone_repository(self.credentials, self.config.git_timeout)
            .await?;
        self.progress
            .on_workspace(workspace.path(), clone_status)
            .await;

        self.progress.on_phase(Phase::CheckingOut).await;
        let base = match base {
            Some(b) => b.to_string(),
            None => default_branch(&workspace)?,
        };
        let branch = checkout_update_branch(&workspace, version, &base)?;
        self.progress.on_branch(&branch).await;

        Ok(PreparedWorkspace {
            workspace,
            branch,
            clone_status,
        })
    }

    /// Commit `files`, push the branch, and make sure a request is open
    pub async fn publish(
        &self,
        prepared: &PreparedWorkspace,
        files: &[PathBuf],
        message: &str,
    ) -> Result<PublicationOutcome> {
        let workspace = &prepared.workspace;
        let branch = &prepared.branch;

        self.progress.on_phase(Phase::Committing).await;
        let commit = self.record(workspace, branch, files, message)?;
        match commit {
            Some(ref c) => self.progress.on_commit(c).await,
            None => {
                self.progress
                    .on_message(&format!("{} is already up to date", branch.name))
                    .await;
            }
        }

        self.progress.on_phase(Phase::Pushing).await;
        self.progress.on_push(&branch.name, PushStatus::Started).await;
        if let Err(e) =
            push_branch(workspace, self.credentials, branch, self.config.git_timeout).await
        {
            self.progress
                .on_push(&branch.name, PushStatus::Failed(e.to_string()))
                .await;
            return Err(e);
        }
        self.progress.on_push(&branch.name, PushStatus::Success).await;

        self.progress.on_phase(Phase::OpeningRequest).await;
        let result = ensure_request(
            self.client,
            workspace.version(),
            &branch.name,
            &branch.base,
            &self.config.request_body,
        )
        .await?;
        self.progress.on_request(&result).await;

        self.progress.on_phase(Phase::Complete).await;

        Ok(PublicationOutcome {
            workspace_path: workspace.path().to_path_buf(),
            commit,
            result,
        })
    }

    /// Stage and commit; tolerate "no changes" when an earlier run already
    /// committed the same content on this branch
    fn record(
        &self,
        workspace: &Workspace,
        branch: &Branch,
        files: &[PathBuf],
        message: &str,
    ) -> Result<Option<Commit>> {
        let mut recorder = ChangeRecorder::new(workspace);
        for file in files {
            recorder.stage(file)?;
        }

        match recorder.commit(&self.config.author, message) {
            Ok(commit) => Ok(Some(commit)),
            Err(Error::NoChanges) if !files.is_empty() && commits_ahead(workspace, branch)? > 0 => {
                info!(
                    "{} already carries these changes, publishing existing commits",
                    branch.name
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
