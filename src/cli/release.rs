//! Release commands - resolve and match upstream releases

use crate::cli::Target;
use crate::cli::style::{Stylize, check, cross};
use anstream::{eprintln, println};
use updatecli_publish::error::Result;
use updatecli_publish::release::{ReleaseMatch, match_release, resolve_version};

/// Print the name of the release selected by `selector`
pub async fn run_release_resolve(target: &Target, selector: &str) -> Result<()> {
    let connection = target.connect().await?;
    let version = resolve_version(connection.client.as_ref(), selector).await?;
    // Bare value on stdout so the command can be used in scripts
    println!("{version}");
    Ok(())
}

/// Report whether a release tagged `tag` (or `fallback`) exists
///
/// Returns `false` when there is no match.
pub async fn run_release_match(target: &Target, tag: &str, fallback: &str) -> Result<bool> {
    let connection = target.connect().await?;
    let outcome = match_release(connection.client.as_ref(), tag, fallback).await?;

    match &outcome {
        ReleaseMatch::Found(found) => {
            println!("{} Release {} exists", check(), found.accent());
        }
        ReleaseMatch::NoReleases => {
            eprintln!(
                "{} {} {}",
                cross(),
                format!("{} has no releases", connection.client.identity()).warn(),
                "(looking for a git tag instead?)".muted().for_stderr()
            );
        }
        ReleaseMatch::NoMatch => {
            eprintln!("{} No release matches the requested tag", cross());
        }
    }

    Ok(outcome.is_match())
}
