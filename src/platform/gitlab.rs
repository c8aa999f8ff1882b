//! GitLab platform service implementation

use crate::error::{Error, Result};
use crate::platform::{PER_PAGE, ScmClient, ensure_valid_url};
use crate::types::{
    NewPullRequest, Platform, PullRequest, Release, RepositoryIdentity, RequestState,
};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// GitLab service using reqwest
pub struct GitLabService {
    client: Client,
    token: String,
    base_url: String,
    identity: RepositoryIdentity,
}

#[derive(Deserialize)]
struct MergeRequest {
    iid: u64,
    web_url: String,
    source_branch: String,
    target_branch: String,
    title: String,
    description: Option<String>,
    state: String,
}

#[derive(Deserialize)]
struct GitLabRelease {
    tag_name: String,
    name: Option<String>,
}

#[derive(Deserialize)]
struct ApiMessage {
    message: Option<String>,
}

#[derive(Serialize)]
struct CreateMrPayload<'a> {
    source_branch: &'a str,
    target_branch: &'a str,
    title: &'a str,
    description: &'a str,
}

impl From<MergeRequest> for PullRequest {
    fn from(mr: MergeRequest) -> Self {
        let state = match mr.state.as_str() {
            "opened" => RequestState::Open,
            "merged" => RequestState::Merged,
            _ => RequestState::Closed,
        };

        Self {
            number: mr.iid,
            html_url: mr.web_url,
            title: mr.title,
            body: mr.description.unwrap_or_default(),
            head_ref: mr.source_branch,
            base_ref: mr.target_branch,
            state,
        }
    }
}

impl From<GitLabRelease> for Release {
    fn from(r: GitLabRelease) -> Self {
        Self {
            tag: r.tag_name,
            name: r.name,
        }
    }
}

impl GitLabService {
    /// Create a new GitLab service
    ///
    /// `url` is the instance URL; it is normalized with [`ensure_valid_url`],
    /// so an empty string means gitlab.com.
    pub fn new(
        token: String,
        identity: RepositoryIdentity,
        url: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| Error::GitLabApi(e.to_string()))?;

        Ok(Self {
            client,
            token,
            base_url: ensure_valid_url(url).trim_end_matches('/').to_string(),
            identity,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v4{}", self.base_url, path)
    }

    fn project_url(&self, path: &str) -> String {
        let project = urlencoding::encode(&self.identity.full_name()).into_owned();
        self.api_url(&format!("/projects/{project}{path}"))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header("PRIVATE-TOKEN", &self.token)
            .query(query)
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }

    async fn list_pages<T: DeserializeOwned>(
        &self,
        path: &str,
        filters: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let url = self.project_url(path);
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            let mut query: Vec<(&str, String)> = filters
                .iter()
                .map(|(k, v)| (*k, (*v).to_string()))
                .collect();
            query.push(("per_page", PER_PAGE.to_string()));
            query.push(("page", page.to_string()));

            let batch: Vec<T> = self.get_json(&url, &query).await?;
            let done = batch.len() < PER_PAGE;
            items.extend(batch);
            if done {
                break;
            }
            page += 1;
        }

        debug!("Fetched {} item(s) from {path}", items.len());
        Ok(items)
    }

    /// Check whether `branch` exists on the remote project
    ///
    /// Needs no local workspace. A missing branch is `Ok(false)`; a missing
    /// project is [`Error::NotFound`].
    pub async fn branch_exists(&self, branch: &str) -> Result<bool> {
        let url = self.project_url(&format!(
            "/repository/branches/{}",
            urlencoding::encode(branch)
        ));

        let response = self
            .client
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            let message = response
                .json::<ApiMessage>()
                .await
                .ok()
                .and_then(|m| m.message)
                .unwrap_or_default();

            if message.contains("Branch Not Found") {
                debug!("Branch {branch} not found on {}", self.identity);
                return Ok(false);
            }
            return Err(Error::NotFound(format!(
                "project {} ({message})",
                self.identity.full_name()
            )));
        }

        check_status(response).await?;
        Ok(true)
    }
}

/// Map non-success responses to typed errors
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let path = response.url().path().to_string();
    let message = response
        .json::<ApiMessage>()
        .await
        .ok()
        .and_then(|m| m.message)
        .unwrap_or_else(|| status.to_string());

    if status == StatusCode::NOT_FOUND {
        Err(Error::NotFound(format!("{path}: {message}")))
    } else {
        Err(Error::GitLabApi(format!("{status} on {path}: {message}")))
    }
}

#[async_trait]
impl ScmClient for GitLabService {
    fn platform(&self) -> Platform {
        Platform::GitLab
    }

    fn identity(&self) -> &RepositoryIdentity {
        &self.identity
    }

    async fn get_release(&self, selector: &str) -> Result<Release> {
        let path = if selector == "latest" {
            "/releases/permalink/latest".to_string()
        } else {
            format!("/releases/{}", urlencoding::encode(selector))
        };

        let release: GitLabRelease = self.get_json(&self.project_url(&path), &[]).await?;
        Ok(release.into())
    }

    async fn list_releases(&self) -> Result<Vec<Release>> {
        let releases: Vec<GitLabRelease> = self.list_pages("/releases", &[]).await?;
        Ok(releases.into_iter().map(Release::from).collect())
    }

    async fn list_open_requests(&self) -> Result<Vec<PullRequest>> {
        let mrs: Vec<MergeRequest> = self
            .list_pages("/merge_requests", &[("state", "opened")])
            .await?;
        Ok(mrs.into_iter().map(PullRequest::from).collect())
    }

    async fn create_request(&self, request: &NewPullRequest) -> Result<PullRequest> {
        let payload = CreateMrPayload {
            source_branch: &request.head,
            target_branch: &request.base,
            title: &request.title,
            description: &request.body,
        };

        let response = self
            .client
            .post(self.project_url("/merge_requests"))
            .header("PRIVATE-TOKEN", &self.token)
            .json(&payload)
            .send()
            .await?;

        let mr: MergeRequest = check_status(response).await?.json().await?;
        Ok(mr.into())
    }
}
