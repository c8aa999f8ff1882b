//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::{PER_PAGE, ScmClient};
use crate::types::{
    NewPullRequest, Platform, PullRequest, Release, RepositoryIdentity, RequestState,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    identity: RepositoryIdentity,
}

#[derive(Deserialize)]
struct ReleasePayload {
    tag_name: String,
    name: Option<String>,
}

#[derive(Deserialize)]
struct PullPayload {
    number: u64,
    html_url: String,
    title: String,
    body: Option<String>,
    state: String,
    merged_at: Option<String>,
    head: RefPayload,
    base: RefPayload,
}

#[derive(Deserialize)]
struct RefPayload {
    #[serde(rename = "ref")]
    ref_field: String,
}

#[derive(Serialize)]
struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'static str>,
    per_page: usize,
    page: u32,
}

impl From<ReleasePayload> for Release {
    fn from(r: ReleasePayload) -> Self {
        Self {
            tag: r.tag_name,
            name: r.name,
        }
    }
}

impl From<PullPayload> for PullRequest {
    fn from(pr: PullPayload) -> Self {
        let state = if pr.merged_at.is_some() {
            RequestState::Merged
        } else if pr.state == "open" {
            RequestState::Open
        } else {
            RequestState::Closed
        };

        Self {
            number: pr.number,
            html_url: pr.html_url,
            title: pr.title,
            body: pr.body.unwrap_or_default(),
            head_ref: pr.head.ref_field,
            base_ref: pr.base.ref_field,
            state,
        }
    }
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// `api_url` overrides the API endpoint; otherwise github.com uses
    /// `api.github.com` and any other host is treated as GitHub Enterprise.
    pub fn new(
        token: &str,
        identity: RepositoryIdentity,
        api_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut builder = Octocrab::builder()
            .personal_token(token.to_string())
            .set_connect_timeout(Some(timeout))
            .set_read_timeout(Some(timeout))
            .set_write_timeout(Some(timeout));

        let base_url = api_url.or_else(|| {
            (identity.host != "github.com").then(|| format!("https://{}/api/v3", identity.host))
        });

        if let Some(ref base_url) = base_url {
            builder = builder
                .base_uri(base_url.as_str())
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
        }

        let client = builder.build().map_err(|e| Error::GitHubApi(e.to_string()))?;

        Ok(Self { client, identity })
    }

    fn repo_route(&self, path: &str) -> String {
        format!(
            "/repos/{}/{}{}",
            self.identity.owner, self.identity.name, path
        )
    }

    async fn list_pages<T>(&self, path: &str, state: Option<&'static str>) -> Result<Vec<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let route = self.repo_route(path);
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            let params = ListParams {
                state,
                per_page: PER_PAGE,
                page,
            };
            let batch: Vec<T> = self.client.get(&route, Some(&params)).await?;
            let done = batch.len() < PER_PAGE;
            items.extend(batch);
            if done {
                break;
            }
            page += 1;
        }

        debug!("Fetched {} item(s) from {route}", items.len());
        Ok(items)
    }
}

/// `latest` and numeric ids have their own routes; anything else is a tag
fn release_path(selector: &str) -> String {
    let is_id = !selector.is_empty() && selector.bytes().all(|b| b.is_ascii_digit());
    if selector == "latest" || is_id {
        format!("/releases/{selector}")
    } else {
        format!("/releases/tags/{}", urlencoding::encode(selector))
    }
}

#[async_trait]
impl ScmClient for GitHubService {
    fn platform(&self) -> Platform {
        Platform::GitHub
    }

    fn identity(&self) -> &RepositoryIdentity {
        &self.identity
    }

    async fn get_release(&self, selector: &str) -> Result<Release> {
        let route = self.repo_route(&release_path(selector));
        let release: ReleasePayload = self.client.get(&route, None::<&()>).await?;
        Ok(release.into())
    }

    async fn list_releases(&self) -> Result<Vec<Release>> {
        let releases: Vec<ReleasePayload> = self.list_pages("/releases", None).await?;
        Ok(releases.into_iter().map(Release::from).collect())
    }

    async fn list_open_requests(&self) -> Result<Vec<PullRequest>> {
        let pulls: Vec<PullPayload> = self.list_pages("/pulls", Some("open")).await?;
        Ok(pulls.into_iter().map(PullRequest::from).collect())
    }

    async fn create_request(&self, request: &NewPullRequest) -> Result<PullRequest> {
        let route = self.repo_route("/pulls");
        let pr: PullPayload = self.client.post(&route, Some(request)).await?;
        Ok(pr.into())
    }
}
