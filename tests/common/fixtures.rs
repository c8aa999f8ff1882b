//! Test data factories for updatecli-publish types
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use updatecli_publish::types::{PullRequest, Release, RepositoryIdentity, RequestState};

/// `github.com/updatecli/website`
pub fn github_identity() -> RepositoryIdentity {
    RepositoryIdentity::new("github.com", "updatecli", "website")
}

/// `gitlab.com/updatecli/website`
pub fn gitlab_identity() -> RepositoryIdentity {
    RepositoryIdentity::new("gitlab.com", "updatecli", "website")
}

/// Create a release with a name equal to its tag
pub fn make_release(tag: &str) -> Release {
    Release {
        tag: tag.to_string(),
        name: Some(tag.to_string()),
    }
}

/// Create a release without a name
pub fn make_unnamed_release(tag: &str) -> Release {
    Release {
        tag: tag.to_string(),
        name: None,
    }
}

/// Create an open pull request with default values
pub fn make_pr(number: u64, title: &str) -> PullRequest {
    PullRequest {
        number,
        html_url: format!("https://github.com/updatecli/website/pull/{number}"),
        title: title.to_string(),
        body: String::new(),
        head_ref: format!("head-{number}"),
        base_ref: "main".to_string(),
        state: RequestState::Open,
    }
}

/// GitHub pull request JSON as returned by the REST API
pub fn github_pull_json(number: u64, title: &str, head: &str, base: &str) -> serde_json::Value {
    serde_json::json!({
        "number": number,
        "html_url": format!("https://github.com/updatecli/website/pull/{number}"),
        "title": title,
        "body": null,
        "state": "open",
        "merged_at": null,
        "head": { "ref": head },
        "base": { "ref": base },
    })
}

/// GitLab merge request JSON as returned by the REST API
pub fn gitlab_mr_json(iid: u64, title: &str, source: &str, target: &str) -> serde_json::Value {
    serde_json::json!({
        "iid": iid,
        "web_url": format!("https://gitlab.com/updatecli/website/-/merge_requests/{iid}"),
        "title": title,
        "description": "",
        "state": "opened",
        "source_branch": source,
        "target_branch": target,
    })
}

/// HTTP endpoint that accepts connections and never answers
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
