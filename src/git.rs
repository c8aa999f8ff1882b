//! Git network transport
//!
//! Clone and push shell out to the `git` binary so every transport call can
//! be bounded by a timeout. Local repository work (branches, index, commits)
//! goes through `git2` instead.

use crate::error::{Error, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Run `git <args>` in `cwd`, failing with [`Error::Timeout`] after `timeout`
///
/// Every occurrence of `secret` in the captured output is replaced before
/// it reaches an error message.
pub async fn run_git(args: &[&str], cwd: &Path, timeout: Duration, secret: &str) -> Result<String> {
    let subcommand = args.first().copied().unwrap_or("git");
    debug!("Running git {subcommand} in {}", cwd.display());

    let child = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| Error::Git(format!("failed to execute git {subcommand}: {e}")))?;

    let output = tokio::time::timeout(timeout, child.wait_with_output())
        .await
        .map_err(|_| {
            Error::Timeout(format!(
                "git {subcommand} after {}s",
                timeout.as_secs()
            ))
        })?
        .map_err(|e| Error::Git(format!("git {subcommand} did not complete: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Git(format!(
            "git {subcommand} failed: {}",
            redact(stderr.trim(), secret)
        )));
    }

    Ok(redact(String::from_utf8_lossy(&output.stdout).trim(), secret))
}

/// Replace `secret` (raw and percent-encoded) with a placeholder
pub fn redact(text: &str, secret: &str) -> String {
    if secret.is_empty() {
        return text.to_string();
    }
    let encoded = urlencoding::encode(secret);
    text.replace(secret, "***").replace(encoded.as_ref(), "***")
}
