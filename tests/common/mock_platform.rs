//! Mock SCM client for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use updatecli_publish::error::{Error, Result};
use updatecli_publish::platform::ScmClient;
use updatecli_publish::types::{
    NewPullRequest, Platform, PullRequest, Release, RepositoryIdentity, RequestState,
};

/// Simple mock SCM client for testing
///
/// This manually implements `ScmClient` rather than using mockall,
/// because mockall has issues with methods returning references.
///
/// Features:
/// - Auto-incrementing request numbers
/// - Created requests show up in later listings
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockScmClient {
    platform: Platform,
    identity: RepositoryIdentity,
    next_number: AtomicU64,
    releases: Mutex<Vec<Release>>,
    open_requests: Mutex<Vec<PullRequest>>,
    // Call tracking
    get_release_calls: Mutex<Vec<String>>,
    list_releases_calls: AtomicU64,
    list_open_calls: AtomicU64,
    create_calls: Mutex<Vec<NewPullRequest>>,
    // Error injection
    error_on_list_open: Mutex<Option<String>>,
    error_on_create: Mutex<Option<String>>,
    error_on_releases: Mutex<Option<String>>,
}

impl MockScmClient {
    /// Create a new mock for `identity`
    pub fn new(platform: Platform, identity: RepositoryIdentity) -> Self {
        Self {
            platform,
            identity,
            next_number: AtomicU64::new(1),
            releases: Mutex::new(Vec::new()),
            open_requests: Mutex::new(Vec::new()),
            get_release_calls: Mutex::new(Vec::new()),
            list_releases_calls: AtomicU64::new(0),
            list_open_calls: AtomicU64::new(0),
            create_calls: Mutex::new(Vec::new()),
            error_on_list_open: Mutex::new(None),
            error_on_create: Mutex::new(None),
            error_on_releases: Mutex::new(None),
        }
    }

    /// GitHub mock for `updatecli/website`
    pub fn github() -> Self {
        Self::new(Platform::GitHub, crate::common::github_identity())
    }

    /// GitLab mock for `updatecli/website`
    pub fn gitlab() -> Self {
        Self::new(Platform::GitLab, crate::common::gitlab_identity())
    }

    // === Configuration ===

    /// Replace the releases returned by list/get
    pub fn set_releases(&self, releases: Vec<Release>) {
        *self.releases.lock().unwrap() = releases;
    }

    /// Add an already open request
    pub fn add_open_request(&self, pr: PullRequest) {
        self.open_requests.lock().unwrap().push(pr);
    }

    // === Error injection methods ===

    /// Make `list_open_requests` return an error
    pub fn fail_list_open(&self, msg: &str) {
        *self.error_on_list_open.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_request` return an error
    pub fn fail_create(&self, msg: &str) {
        *self.error_on_create.lock().unwrap() = Some(msg.to_string());
    }

    /// Make release lookups return an error
    pub fn fail_releases(&self, msg: &str) {
        *self.error_on_releases.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification methods ===

    /// Selectors passed to `get_release`
    pub fn get_release_calls(&self) -> Vec<String> {
        self.get_release_calls.lock().unwrap().clone()
    }

    /// Number of `list_releases` calls
    pub fn list_releases_count(&self) -> u64 {
        self.list_releases_calls.load(Ordering::SeqCst)
    }

    /// Number of `list_open_requests` calls
    pub fn list_open_count(&self) -> u64 {
        self.list_open_calls.load(Ordering::SeqCst)
    }

    /// All `create_request` calls
    pub fn create_calls(&self) -> Vec<NewPullRequest> {
        self.create_calls.lock().unwrap().clone()
    }

    /// Assert that `create_request` was called with specific head and base
    pub fn assert_create_called(&self, head: &str, base: &str) {
        let calls = self.create_calls();
        assert!(
            calls.iter().any(|c| c.head == head && c.base == base),
            "Expected create_request({head}, {base}) but got: {calls:?}"
        );
    }

    fn api_error(&self, msg: &str) -> Error {
        match self.platform {
            Platform::GitHub => Error::GitHubApi(msg.to_string()),
            Platform::GitLab => Error::GitLabApi(msg.to_string()),
        }
    }

    fn injected(&self, slot: &Mutex<Option<String>>) -> Result<()> {
        match slot.lock().unwrap().as_ref() {
            Some(msg) => Err(self.api_error(msg)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ScmClient for MockScmClient {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn identity(&self) -> &RepositoryIdentity {
        &self.identity
    }

    async fn get_release(&self, selector: &str) -> Result<Release> {
        self.get_release_calls
            .lock()
            .unwrap()
            .push(selector.to_string());
        self.injected(&self.error_on_releases)?;

        let releases = self.releases.lock().unwrap();
        let found = if selector == "latest" {
            releases.first()
        } else {
            releases.iter().find(|r| r.tag == selector)
        };
        found
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("release {selector}")))
    }

    async fn list_releases(&self) -> Result<Vec<Release>> {
        self.list_releases_calls.fetch_add(1, Ordering::SeqCst);
        self.injected(&self.error_on_releases)?;
        Ok(self.releases.lock().unwrap().clone())
    }

    async fn list_open_requests(&self) -> Result<Vec<PullRequest>> {
        self.list_open_calls.fetch_add(1, Ordering::SeqCst);
        self.injected(&self.error_on_list_open)?;
        Ok(self.open_requests.lock().unwrap().clone())
    }

    async fn create_request(&self, request: &NewPullRequest) -> Result<PullRequest> {
        self.create_calls.lock().unwrap().push(request.clone());
        self.injected(&self.error_on_create)?;

        let number = self.next_number.fetch_add(1, Ordering::SeqCst);
        let pr = PullRequest {
            number,
            html_url: format!("https://{}/{}/pull/{number}", self.identity.host, self.identity.full_name()),
            title: request.title.clone(),
            body: request.body.clone(),
            head_ref: request.head.clone(),
            base_ref: request.base.clone(),
            state: RequestState::Open,
        };
        self.open_requests.lock().unwrap().push(pr.clone());
        Ok(pr)
    }
}
