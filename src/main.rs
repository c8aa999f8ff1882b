//! updatecli-publish - publish dependency updates as pull/merge requests
//!
//! CLI binary wrapping the publication workflow for GitHub and GitLab.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use updatecli_publish::types::Platform;

mod cli;

#[derive(Parser)]
#[command(name = "updatecli-publish")]
#[command(about = "Publish dependency updates as GitHub PRs or GitLab MRs")]
#[command(version)]
struct Cli {
    /// Repository URL (defaults to the origin remote of the current directory)
    #[arg(long, global = true)]
    repo: Option<String>,

    /// API endpoint (GitHub) or instance URL (GitLab) when it differs from the repository host
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory under which workspaces are created
    #[arg(long, global = true)]
    workspace_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone the repository and check out the update branch, then print the workspace path
    Prepare {
        /// Version being published
        #[arg(long)]
        version: String,

        /// Branch the update is based on (defaults to the remote's default branch)
        #[arg(long)]
        base: Option<String>,
    },

    /// Commit files, push the update branch and open a request
    Publish {
        /// Version being published
        #[arg(long)]
        version: String,

        /// File to stage, relative to the workspace (repeatable)
        #[arg(long = "file")]
        files: Vec<PathBuf>,

        /// Copy a local file into the workspace before staging it (SRC=DEST, repeatable)
        #[arg(long = "copy", value_parser = cli::parse_copy)]
        copies: Vec<(PathBuf, PathBuf)>,

        /// Commit message
        #[arg(short, long)]
        message: Option<String>,

        /// Branch the update is based on (defaults to the remote's default branch)
        #[arg(long)]
        base: Option<String>,

        /// Only print outcomes, not every phase
        #[arg(short, long)]
        quiet: bool,
    },

    /// Release lookups
    Release {
        #[command(subcommand)]
        action: ReleaseAction,
    },

    /// Check whether a branch exists on the remote (GitLab only)
    BranchExists {
        /// Branch name
        #[arg(long)]
        branch: String,
    },

    /// Remove the workspace of a version
    Clean {
        /// Version whose workspace is removed
        #[arg(long)]
        version: String,
    },

    /// Authentication management
    Auth {
        #[command(subcommand)]
        platform: AuthPlatform,
    },
}

#[derive(Subcommand)]
enum ReleaseAction {
    /// Print the name of a release
    Resolve {
        /// `latest`, a release id, or a tag
        #[arg(long, default_value = "latest")]
        selector: String,
    },
    /// Check that a release with the given tag exists; exits 1 when it does not
    Match {
        /// Release tag to look for
        #[arg(long, default_value = "")]
        tag: String,

        /// Tag used when --tag is empty
        #[arg(long, default_value = "")]
        fallback: String,
    },
}

#[derive(Subcommand)]
enum AuthPlatform {
    /// GitHub authentication
    Github {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// GitLab authentication
    Gitlab {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Test authentication
    Test,
    /// Show authentication setup instructions
    Setup,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("updatecli_publish=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let target = cli::Target {
        repo: cli.repo,
        api_url: cli.api_url,
        workspace_root: cli.workspace_root,
    };

    match cli.command {
        Commands::Prepare { version, base } => {
            cli::run_prepare(&target, &version, base.as_deref()).await?;
        }
        Commands::Publish {
            version,
            files,
            copies,
            message,
            base,
            quiet,
        } => {
            cli::run_publish(
                &target,
                &version,
                &files,
                &copies,
                message.as_deref(),
                base.as_deref(),
                quiet,
            )
            .await?;
        }
        Commands::Release { action } => match action {
            ReleaseAction::Resolve { selector } => {
                cli::run_release_resolve(&target, &selector).await?;
            }
            ReleaseAction::Match { tag, fallback } => {
                if !cli::run_release_match(&target, &tag, &fallback).await? {
                    return Ok(ExitCode::from(1));
                }
            }
        },
        Commands::BranchExists { branch } => {
            cli::run_branch_exists(&target, &branch).await?;
        }
        Commands::Clean { version } => {
            cli::run_clean(&target, &version)?;
        }
        Commands::Auth { platform } => match platform {
            AuthPlatform::Github { action } => {
                let action_str = match action {
                    AuthAction::Test => "test",
                    AuthAction::Setup => "setup",
                };
                cli::run_auth(Platform::GitHub, action_str, target.api_url.as_deref()).await?;
            }
            AuthPlatform::Gitlab { action } => {
                let action_str = match action {
                    AuthAction::Test => "test",
                    AuthAction::Setup => "setup",
                };
                cli::run_auth(Platform::GitLab, action_str, target.api_url.as_deref()).await?;
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}
