//! Prepare, publish and clean commands

use crate::cli::Target;
use crate::cli::progress::CliProgress;
use crate::cli::style::{Stylize, check};
use anstream::println;
use std::fs;
use std::path::{Component, Path, PathBuf};
use updatecli_publish::error::{Error, Result};
use updatecli_publish::publish::{NoopProgress, Publication};
use updatecli_publish::workspace::Workspace;

/// Clone and check out the update branch, then print the workspace path
///
/// Only the path goes to stdout so callers can capture it; logs go to stderr.
pub async fn run_prepare(target: &Target, version: &str, base: Option<&str>) -> Result<()> {
    let connection = target.connect().await?;
    let publication = Publication::new(
        connection.client.as_ref(),
        &connection.credentials,
        &connection.config,
        &NoopProgress,
    );

    let prepared = publication.prepare(version, base).await?;
    println!("{}", prepared.path().display());
    Ok(())
}

/// Run the full publication for `version`
pub async fn run_publish(
    target: &Target,
    version: &str,
    files: &[PathBuf],
    copies: &[(PathBuf, PathBuf)],
    message: Option<&str>,
    base: Option<&str>,
    quiet: bool,
) -> Result<()> {
    let connection = target.connect().await?;
    let progress = if quiet {
        CliProgress::compact()
    } else {
        CliProgress::verbose()
    };
    let publication = Publication::new(
        connection.client.as_ref(),
        &connection.credentials,
        &connection.config,
        &progress,
    );

    let prepared = publication.prepare(version, base).await?;

    let mut staged = files.to_vec();
    for (src, dest) in copies {
        copy_into(prepared.path(), src, dest)?;
        staged.push(dest.clone());
    }

    let message = message.map_or_else(|| format!("Bump to version {version}"), String::from);
    let outcome = publication.publish(&prepared, &staged, &message).await?;

    println!(
        "{} {} request #{}",
        check(),
        if outcome.result.already_existed {
            "Reused"
        } else {
            "Opened"
        },
        outcome.result.request_identifier().accent()
    );
    Ok(())
}

/// Remove the workspace for `version`
pub fn run_clean(target: &Target, version: &str) -> Result<()> {
    let (_, identity) = target.identify()?;
    let config = target.config()?;
    let path = Workspace::path_for(&config.workspace_root, &identity, version)?;

    if !path.exists() {
        println!("{}", "Nothing to clean".muted());
        return Ok(());
    }

    let workspace = Workspace::provision(&config.workspace_root, &identity, version)?;
    workspace.cleanup()?;
    println!("{} Removed {}", check(), path.display().accent());
    Ok(())
}

/// Copy a local file to `dest` inside the workspace
fn copy_into(workspace: &Path, src: &Path, dest: &Path) -> Result<()> {
    let inside = dest
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !inside {
        return Err(Error::Validation(format!(
            "copy destination {} must be a path inside the workspace",
            dest.display()
        )));
    }

    let target = workspace.join(dest);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, &target).map_err(|e| {
        Error::Validation(format!("cannot copy {}: {e}", src.display()))
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_into_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("VERSION.new");
        fs::write(&src, "1.2.0\n").unwrap();
        let workspace = tmp.path().join("ws");
        fs::create_dir(&workspace).unwrap();

        copy_into(&workspace, &src, Path::new("config/VERSION")).unwrap();
        assert_eq!(
            fs::read_to_string(workspace.join("config/VERSION")).unwrap(),
            "1.2.0\n"
        );
    }

    #[test]
    fn test_copy_into_rejects_escaping_destination() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("VERSION.new");
        fs::write(&src, "1.2.0\n").unwrap();
        let workspace = tmp.path().join("a").join("ws");
        fs::create_dir_all(&workspace).unwrap();

        for dest in ["../../escaped", "sub/../../escaped", "/tmp/escaped"] {
            let err = copy_into(&workspace, &src, Path::new(dest)).unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{dest}: {err:?}");
        }
        assert!(!tmp.path().join("escaped").exists());
    }
}
