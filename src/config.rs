//! Workflow configuration loaded from the environment

use crate::error::{Error, Result};
use crate::types::CommitAuthor;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default timeout for host API calls, in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default timeout for git clone/push, in seconds
pub const DEFAULT_GIT_TIMEOUT_SECS: u64 = 300;

/// Default commit author name
pub const DEFAULT_AUTHOR_NAME: &str = "updatecli";

/// Default commit author email
pub const DEFAULT_AUTHOR_EMAIL: &str = "updatecli@users.noreply.github.com";

/// Default pull request description
pub const DEFAULT_REQUEST_BODY: &str = "Please pull these awesome changes in!";

/// Settings shared by every step of a publication
///
/// Built once per invocation and passed by reference; nothing mutates it
/// after construction.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Directory under which workspaces are provisioned
    pub workspace_root: PathBuf,
    /// Timeout applied to every host API call
    pub http_timeout: Duration,
    /// Timeout applied to every git network operation
    pub git_timeout: Duration,
    /// Author of update commits
    pub author: CommitAuthor,
    /// Description used for new requests
    pub request_body: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            workspace_root: env::temp_dir(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            git_timeout: Duration::from_secs(DEFAULT_GIT_TIMEOUT_SECS),
            author: CommitAuthor {
                name: DEFAULT_AUTHOR_NAME.to_string(),
                email: DEFAULT_AUTHOR_EMAIL.to_string(),
            },
            request_body: DEFAULT_REQUEST_BODY.to_string(),
        }
    }
}

impl WorkflowConfig {
    /// Load configuration from environment variables, falling back to defaults
    ///
    /// - `UPDATECLI_WORKSPACE_ROOT`
    /// - `UPDATECLI_HTTP_TIMEOUT_SECS`
    /// - `UPDATECLI_GIT_TIMEOUT_SECS`
    /// - `UPDATECLI_GIT_AUTHOR_NAME`
    /// - `UPDATECLI_GIT_AUTHOR_EMAIL`
    /// - `UPDATECLI_REQUEST_BODY`
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let workspace_root = env::var("UPDATECLI_WORKSPACE_ROOT")
            .map_or(defaults.workspace_root, PathBuf::from);

        let http_timeout = parse_secs("UPDATECLI_HTTP_TIMEOUT_SECS")?
            .map_or(defaults.http_timeout, Duration::from_secs);

        let git_timeout = parse_secs("UPDATECLI_GIT_TIMEOUT_SECS")?
            .map_or(defaults.git_timeout, Duration::from_secs);

        let author = CommitAuthor {
            name: env::var("UPDATECLI_GIT_AUTHOR_NAME").unwrap_or(defaults.author.name),
            email: env::var("UPDATECLI_GIT_AUTHOR_EMAIL").unwrap_or(defaults.author.email),
        };

        let request_body = env::var("UPDATECLI_REQUEST_BODY").unwrap_or(defaults.request_body);

        Ok(Self {
            workspace_root,
            http_timeout,
            git_timeout,
            author,
            request_body,
        })
    }
}

fn parse_secs(var: &str) -> Result<Option<u64>> {
    match env::var(var) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(0) | Err(_) => Err(Error::Config(format!(
                "{var} must be a positive number of seconds, got {raw:?}"
            ))),
            Ok(secs) => Ok(Some(secs)),
        },
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 6] = [
        "UPDATECLI_WORKSPACE_ROOT",
        "UPDATECLI_HTTP_TIMEOUT_SECS",
        "UPDATECLI_GIT_TIMEOUT_SECS",
        "UPDATECLI_GIT_AUTHOR_NAME",
        "UPDATECLI_GIT_AUTHOR_EMAIL",
        "UPDATECLI_REQUEST_BODY",
    ];

    fn clear_env() {
        for var in VARS {
            // SAFETY: tests touching the environment are serialized
            #[allow(unsafe_code)]
            unsafe {
                env::remove_var(var);
            }
        }
    }

    fn set_env(var: &str, value: &str) {
        // SAFETY: tests touching the environment are serialized
        #[allow(unsafe_code)]
        unsafe {
            env::set_var(var, value);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_when_unset() {
        clear_env();
        let config = WorkflowConfig::from_env().unwrap();
        assert_eq!(config.workspace_root, env::temp_dir());
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.git_timeout, Duration::from_secs(300));
        assert_eq!(config.author.name, "updatecli");
        assert_eq!(config.request_body, DEFAULT_REQUEST_BODY);
    }

    #[test]
    #[serial]
    fn test_overrides_from_env() {
        clear_env();
        set_env("UPDATECLI_WORKSPACE_ROOT", "/var/tmp/updatecli");
        set_env("UPDATECLI_HTTP_TIMEOUT_SECS", "5");
        set_env("UPDATECLI_GIT_AUTHOR_EMAIL", "bot@example.com");

        let config = WorkflowConfig::from_env().unwrap();
        assert_eq!(config.workspace_root, PathBuf::from("/var/tmp/updatecli"));
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.git_timeout, Duration::from_secs(300));
        assert_eq!(config.author.email, "bot@example.com");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_rejects_invalid_timeout() {
        clear_env();
        set_env("UPDATECLI_GIT_TIMEOUT_SECS", "soon");
        assert!(matches!(WorkflowConfig::from_env(), Err(Error::Config(_))));

        set_env("UPDATECLI_GIT_TIMEOUT_SECS", "0");
        assert!(matches!(WorkflowConfig::from_env(), Err(Error::Config(_))));
        clear_env();
    }
}
