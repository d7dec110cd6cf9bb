//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{RenderCommand, ResolveCommand, SynthCommand, ValidateCommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// Default config file name looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "farm.yaml";

/// Synthesize the Image Builder pipeline for render farm worker images
#[derive(Debug, Parser, Clone)]
#[command(name = "render-farm-image")]
#[command(version = "0.1.0")]
#[command(about = "Synthesizes the EC2 Image Builder pipeline that bakes render farm worker images", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to farm configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Assemble the pipeline and write the CloudFormation template
    Synth(SynthCommand),

    /// Validate a farm configuration
    Validate(ValidateCommand),

    /// Render a component template
    Render(RenderCommand),

    /// Resolve a Deadline version to its installers
    Resolve(ResolveCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }

    /// Config path: `--config`, then `./farm.yaml`, then the user config dir
    pub fn config_path(&self) -> PathBuf {
        if let Some(path) = &self.config {
            return path.clone();
        }

        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return local;
        }

        dirs::config_dir()
            .map(|dir| dir.join("render-farm-image").join(DEFAULT_CONFIG_FILE))
            .unwrap_or(local)
    }
}
