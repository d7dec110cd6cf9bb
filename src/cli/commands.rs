//! CLI command definitions

use clap::Args;
use std::path::PathBuf;

/// Assemble the pipeline and write the CloudFormation template
#[derive(Debug, Args, Clone)]
pub struct SynthCommand {
    /// Output directory (overrides `output_dir` from the config)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Stack name used for the template file
    #[arg(long, default_value = "PocImageStack")]
    pub stack_name: String,

    /// Print the template as JSON
    #[arg(long)]
    pub json: bool,
}

/// Validate a farm configuration
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Render a component template
#[derive(Debug, Args, Clone)]
pub struct RenderCommand {
    /// Path to the template file
    #[arg(short, long)]
    pub template: PathBuf,

    /// Token values (key=value)
    #[arg(long, value_parser = parse_key_value)]
    pub token: Vec<(String, String)>,

    /// Directory to write the rendered file into
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Fail on unused tokens or leftover placeholders
    #[arg(long)]
    pub strict: bool,
}

/// Resolve a Deadline version to its installers
#[derive(Debug, Args, Clone)]
pub struct ResolveCommand {
    /// Installer index (defaults to the one named in the config)
    #[arg(short, long)]
    pub index: Option<PathBuf>,

    /// Version or version prefix; latest when omitted
    #[arg(long = "deadline-version")]
    pub deadline_version: Option<String>,

    /// List every indexed version instead
    #[arg(long)]
    pub list: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Parse key=value pairs
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let parts: Vec<&str> = s.splitn(2, '=').collect();
    if parts.len() != 2 {
        return Err(format!("Invalid key=value pair: {}", s));
    }
    Ok((parts[0].to_string(), parts[1].to_string()))
}
