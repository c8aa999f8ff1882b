//! Progress callback trait for interface-agnostic updates
//!
//! This trait allows different interfaces (CLI, CI log, etc.) to receive
//! progress updates during a publication.

use crate::branch::Branch;
use crate::types::{Commit, PublicationResult};
use crate::workspace::CloneStatus;
use async_trait::async_trait;
use std::fmt;
use std::path::Path;

/// Publication phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Creating or reusing the workspace directory
    Provisioning,
    /// Cloning the repository
    Cloning,
    /// Checking out the update branch
    CheckingOut,
    /// Staging and committing changes
    Committing,
    /// Pushing the branch
    Pushing,
    /// Looking up or opening the request
    OpeningRequest,
    /// Publication complete
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Provisioning => "Provisioning workspace",
            Self::Cloning => "Cloning repository",
            Self::CheckingOut => "Checking out update branch",
            Self::Committing => "Committing changes",
            Self::Pushing => "Pushing branch",
            Self::OpeningRequest => "Opening request",
            Self::Complete => "Done",
        };
        write!(f, "{label}")
    }
}

/// Push operation status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushStatus {
    /// Push started
    Started,
    /// Push succeeded
    Success,
    /// Push failed with error message
    Failed(String),
}

impl fmt::Display for PushStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => write!(f, "pushing"),
            Self::Success => write!(f, "pushed"),
            Self::Failed(msg) => write!(f, "failed: {msg}"),
        }
    }
}

/// Progress callback trait
///
/// Implement this trait to receive progress updates during a publication.
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called when entering a new phase
    async fn on_phase(&self, phase: Phase);

    /// Called once the workspace is ready
    async fn on_workspace(&self, path: &Path, status: CloneStatus);

    /// Called once the update branch is checked out
    async fn on_branch(&self, branch: &Branch);

    /// Called when a commit is created
    async fn on_commit(&self, commit: &Commit);

    /// Called when the branch is being pushed
    async fn on_push(&self, branch: &str, status: PushStatus);

    /// Called with the existing or created request
    async fn on_request(&self, result: &PublicationResult);

    /// Called with a general status message
    async fn on_message(&self, message: &str);
}

/// No-op progress callback for testing or when progress isn't needed
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_phase(&self, _phase: Phase) {}
    async fn on_workspace(&self, _path: &Path, _status: CloneStatus) {}
    async fn on_branch(&self, _branch: &Branch) {}
    async fn on_commit(&self, _commit: &Commit) {}
    async fn on_push(&self, _branch: &str, _status: PushStatus) {}
    async fn on_request(&self, _result: &PublicationResult) {}
    async fn on_message(&self, _message: &str) {}
}
