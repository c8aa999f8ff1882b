//! Shared fixtures for unit tests

use crate::error::{Error, Result};
use crate::platform::ScmClient;
use crate::types::{
    NewPullRequest, Platform, PullRequest, Release, RepositoryIdentity, RequestState,
};
use crate::workspace::Workspace;
use async_trait::async_trait;
use git2::{Repository, Signature};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

pub fn identity() -> RepositoryIdentity {
    RepositoryIdentity::new("github.com", "updatecli", "website")
}

/// Bare repository with one commit on `main`, usable as a clone/push target
pub fn bare_remote(dir: &Path) -> PathBuf {
    let seed_path = dir.join("seed");
    let seed = Repository::init(&seed_path).unwrap();
    fs::write(seed_path.join("README.md"), "# website\n").unwrap();
    fs::write(seed_path.join("VERSION"), "1.0.0\n").unwrap();

    let mut index = seed.index().unwrap();
    index.add_path(Path::new("README.md")).unwrap();
    index.add_path(Path::new("VERSION")).unwrap();
    index.write().unwrap();
    let tree = seed.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = Signature::now("Seed", "seed@example.com").unwrap();
    let commit = seed
        .commit(None, &sig, &sig, "Initial commit", &tree, &[])
        .unwrap();
    seed.reference("refs/heads/main", commit, true, "seed")
        .unwrap();
    seed.set_head("refs/heads/main").unwrap();

    let bare_path = dir.join("remote.git");
    let bare = Repository::init_bare(&bare_path).unwrap();
    let mut remote = seed.remote("origin", bare_path.to_str().unwrap()).unwrap();
    remote
        .push(&["refs/heads/main:refs/heads/main"], None)
        .unwrap();
    bare.set_head("refs/heads/main").unwrap();
    bare_path
}

/// Workspace cloned from a fresh bare remote under `dir`
///
/// Returns the workspace and the path of its remote.
pub async fn cloned_workspace(dir: &Path, version: &str) -> (Workspace, PathBuf) {
    let remote = bare_remote(dir);
    let ws = Workspace::provision(&dir.join("workspaces"), &identity(), version).unwrap();
    ws.clone_from(remote.to_str().unwrap(), "", Duration::from_secs(60))
        .await
        .unwrap();
    (ws, remote)
}

/// Point pushes to `transport_url` at the local `remote` instead
///
/// Uses git's `url.<base>.insteadOf` rewriting, so the code under test still
/// builds its authenticated URL as usual.
pub fn redirect_transport(ws: &Workspace, transport_url: &str, remote: &Path) {
    let repo = ws.open().unwrap();
    let mut config = repo.config().unwrap();
    config
        .set_str(
            &format!("url.{}.insteadOf", remote.display()),
            transport_url,
        )
        .unwrap();
}

/// HTTP endpoint that accepts connections and never answers
///
/// Connections are held open for the life of the runtime.
pub async fn silent_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{addr}")
}

/// In-memory host keeping open requests and releases
#[derive(Default)]
pub struct StubClient {
    pub releases: Vec<Release>,
    pub open: Mutex<Vec<PullRequest>>,
    pub created: Mutex<Vec<NewPullRequest>>,
}

#[async_trait]
impl ScmClient for StubClient {
    fn platform(&self) -> Platform {
        Platform::GitHub
    }

    fn identity(&self) -> &RepositoryIdentity {
        static IDENTITY: std::sync::OnceLock<RepositoryIdentity> = std::sync::OnceLock::new();
        IDENTITY.get_or_init(identity)
    }

    async fn get_release(&self, selector: &str) -> Result<Release> {
        self.releases
            .iter()
            .find(|r| selector == "latest" || r.tag == selector)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("release {selector}")))
    }

    async fn list_releases(&self) -> Result<Vec<Release>> {
        Ok(self.releases.clone())
    }

    async fn list_open_requests(&self) -> Result<Vec<PullRequest>> {
        Ok(self.open.lock().unwrap().clone())
    }

    async fn create_request(&self, request: &NewPullRequest) -> Result<PullRequest> {
        let mut open = self.open.lock().unwrap();
        let pr = PullRequest {
            number: open.len() as u64 + 1,
            html_url: format!("https://github.com/updatecli/website/pull/{}", open.len() + 1),
            title: request.title.clone(),
            body: request.body.clone(),
            head_ref: request.head.clone(),
            base_ref: request.base.clone(),
            state: RequestState::Open,
        };
        open.push(pr.clone());
        self.created.lock().unwrap().push(request.clone());
        Ok(pr)
    }
}
