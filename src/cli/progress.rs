//! CLI progress callback with styled output

use crate::cli::style::{Stream, Stylize, check, cross, hyperlink_url};
use anstream::{eprintln, println};
use async_trait::async_trait;
use std::path::Path;
use updatecli_publish::branch::Branch;
use updatecli_publish::publish::{Phase, ProgressCallback, PushStatus};
use updatecli_publish::types::{Commit, PublicationResult};
use updatecli_publish::workspace::CloneStatus;

/// CLI progress callback that prints to stdout with styled output
///
/// Two modes:
/// - verbose: shows every phase and the details of each step
/// - compact: only outcomes, indented for nested output
pub struct CliProgress {
    /// Verbose mode shows all phases and detailed output
    pub verbose: bool,
}

impl CliProgress {
    /// Create verbose progress
    pub const fn verbose() -> Self {
        Self { verbose: true }
    }

    /// Create compact progress
    pub const fn compact() -> Self {
        Self { verbose: false }
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_phase(&self, phase: Phase) {
        if self.verbose {
            println!("{}...", phase.to_string().emphasis());
        }
    }

    async fn on_workspace(&self, path: &Path, status: CloneStatus) {
        let label = match status {
            CloneStatus::Cloned => "Cloned into",
            CloneStatus::AlreadyCloned => "Reusing",
        };
        if self.verbose {
            println!("  {} {label} {}", check(), path.display().accent());
        }
    }

    async fn on_branch(&self, branch: &Branch) {
        if self.verbose {
            println!(
                "  {} On {} {}",
                check(),
                branch.name.accent(),
                format!("(base {})", branch.base).muted()
            );
        }
    }

    async fn on_commit(&self, commit: &Commit) {
        let short = commit.id.get(..12).unwrap_or(&commit.id);
        let summary = commit.message.lines().next().unwrap_or_default();
        if self.verbose {
            println!("  {} Committed {} {}", check(), short.accent(), summary);
        } else {
            println!("  Committed {}", short.accent());
        }
    }

    async fn on_push(&self, branch: &str, status: PushStatus) {
        match &status {
            PushStatus::Started => {
                if self.verbose {
                    println!("  Pushing {}...", branch.accent());
                }
            }
            PushStatus::Success => {
                if self.verbose {
                    println!("  {} Pushed {}", check(), branch.emphasis());
                } else {
                    println!("  {} {}", "Pushed".success(), branch.accent());
                }
            }
            PushStatus::Failed(_) => {
                eprintln!(
                    "  {} Failed to push {}: {}",
                    cross(),
                    branch.accent().for_stderr(),
                    status.to_string().error()
                );
            }
        }
    }

    async fn on_request(&self, result: &PublicationResult) {
        let number = format!("#{}", result.request.number);
        let verb = if result.already_existed {
            "Found open request"
        } else {
            "Opened request"
        };

        if self.verbose {
            println!("  {} {verb} {}", check(), number.accent());
            println!(
                "    {}",
                hyperlink_url(Stream::Stdout, &result.request.html_url)
            );
        } else {
            println!(
                "  {verb} {} ({})",
                number.accent(),
                hyperlink_url(Stream::Stdout, &result.request.html_url)
            );
        }
    }

    async fn on_message(&self, message: &str) {
        if self.verbose {
            println!("{message}");
        } else {
            println!("  {}", message.muted());
        }
    }
}
