//! updatecli-publish - publish dependency updates as pull/merge requests
//!
//! Given a target version, the crate clones a repository into a dedicated
//! workspace, checks out a deterministic `updatecli/<version>` branch, commits
//! caller-supplied edits, pushes the branch, and opens exactly one
//! pull request (GitHub) or merge request (GitLab) for it.
//!
//! # Example
//!
//! ```ignore
//! use updatecli_publish::config::WorkflowConfig;
//! use updatecli_publish::platform::{create_scm_client, parse_repo_info};
//! use updatecli_publish::publish::{NoopProgress, Publication};
//!
//! let (platform, identity) = parse_repo_info("https://github.com/updatecli/website")?;
//! let config = WorkflowConfig::from_env()?;
//! let client = create_scm_client(platform, identity, None, &credentials, config.http_timeout)?;
//!
//! let publication = Publication::new(client.as_ref(), &credentials, &config, &NoopProgress);
//! let prepared = publication.prepare("1.2.0", None).await?;
//! std::fs::write(prepared.path().join("VERSION"), "1.2.0\n")?;
//! let outcome = publication.publish(&prepared, &["VERSION".into()], "Bump to 1.2.0").await?;
//! ```

pub mod auth;
pub mod branch;
pub mod change;
pub mod config;
pub mod error;
pub mod git;
pub mod platform;
pub mod publish;
pub mod release;
pub mod types;
pub mod workspace;

#[cfg(test)]
mod test_support;
