//! Core types for updatecli-publish

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Detected platform type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    /// GitHub or GitHub Enterprise
    GitHub,
    /// GitLab or self-hosted GitLab
    GitLab,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GitHub => write!(f, "GitHub"),
            Self::GitLab => write!(f, "GitLab"),
        }
    }
}

/// Identity of a remote repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryIdentity {
    /// Git host (e.g., "github.com")
    pub host: String,
    /// Repository owner (user, organization, or nested GitLab group)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepositoryIdentity {
    /// Create a new identity
    pub fn new(host: impl Into<String>, owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// HTTPS clone URL without credentials
    pub fn public_url(&self) -> String {
        format!("https://{}/{}/{}.git", self.host, self.owner, self.name)
    }

    /// HTTPS clone/push URL with credentials embedded as basic auth
    pub fn transport_url(&self, credentials: &Credentials) -> String {
        format!(
            "https://{}:{}@{}/{}/{}.git",
            urlencoding::encode(&credentials.username),
            urlencoding::encode(&credentials.token),
            self.host,
            self.owner,
            self.name
        )
    }
}

impl fmt::Display for RepositoryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.host, self.owner, self.name)
    }
}

/// Username and token used for git transport and API calls
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account name used in the transport URL
    pub username: String,
    /// Personal access token
    pub token: String,
}

impl Credentials {
    /// Create credentials
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// A release published on the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Tag the release points at
    pub tag: String,
    /// Human-readable release name, if set
    pub name: Option<String>,
}

/// State of a pull/merge request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestState {
    /// Open and mergeable
    Open,
    /// Closed without merging
    Closed,
    /// Merged
    Merged,
}

/// A pull request / merge request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number / MR iid
    pub number: u64,
    /// Web URL for the PR/MR
    pub html_url: String,
    /// PR/MR title
    pub title: String,
    /// Description
    pub body: String,
    /// Head branch name
    pub head_ref: String,
    /// Base branch name
    pub base_ref: String,
    /// Current state
    pub state: RequestState,
}

/// Payload for opening a new pull/merge request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPullRequest {
    /// Title (also the deduplication key)
    pub title: String,
    /// Description
    pub body: String,
    /// Branch holding the changes
    pub head: String,
    /// Branch to merge into
    pub base: String,
}

/// Author used for update commits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitAuthor {
    /// Author name
    pub name: String,
    /// Author email
    pub email: String,
}

/// A commit created by the change recorder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    /// Git commit ID (hex)
    pub id: String,
    /// Author name
    pub author_name: String,
    /// Author email
    pub author_email: String,
    /// Full commit message
    pub message: String,
    /// When the commit was created
    pub timestamp: DateTime<Utc>,
}

/// Outcome of ensuring a request exists for a version
#[derive(Debug, Clone)]
pub struct PublicationResult {
    /// True when an open request with the same title was already there
    pub already_existed: bool,
    /// The existing or newly created request
    pub request: PullRequest,
}

impl PublicationResult {
    /// Identifier of the request on the host (PR number / MR iid)
    pub fn request_identifier(&self) -> String {
        self.request.number.to_string()
    }
}
