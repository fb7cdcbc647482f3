//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! ## Design Notes
//!
//! - A single command; the flags select which stages run
//! - `--local-root` swaps the SFTP server for a local directory

use std::path::PathBuf;

use clap::Parser;

use crate::application::RunFlags;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// Build a front-end project and publish it to shared hosting over SFTP
#[derive(Parser, Debug)]
#[command(name = "sftp-deploy")]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "Credentials are read from SFTP_DEPLOY_HOST, SFTP_DEPLOY_USER and SFTP_DEPLOY_PASSWORD, or from deploy.toml."
)]
pub struct Cli {
    /// Skip the build stage (deploy the existing build output)
    #[arg(long)]
    pub skip_build: bool,

    /// Skip git commit/push and the auto-deploy wait
    #[arg(long)]
    pub skip_git: bool,

    /// Only fix the symlink and upload the server config
    #[arg(long)]
    pub fix_only: bool,

    /// Project root
    #[arg(short = 'C', long = "project", value_name = "DIR", default_value = ".")]
    pub project: PathBuf,

    /// Config file (default: <project>/deploy.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Deploy into a local directory instead of the SFTP server
    #[arg(long, value_name = "DIR")]
    pub local_root: Option<PathBuf>,

    /// Output NDJSON events for CI
    #[arg(long)]
    pub json: bool,

    /// Color output mode
    #[arg(long, value_enum)]
    pub color: Option<ColorWhen>,

    /// Verbosity level (-v lists every uploaded file)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn run_flags(&self) -> RunFlags {
        RunFlags {
            skip_build: self.skip_build,
            skip_git: self.skip_git,
            fix_only: self.fix_only,
        }
    }

    /// Whether the run talks to a real SFTP server
    pub fn uses_sftp(&self) -> bool {
        self.local_root.is_none()
    }
}
