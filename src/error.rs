//! Error types for pipeline assembly

use crate::core::OsType;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while assembling an image pipeline
///
/// Every variant is fatal: assembly stops before any descriptor is returned.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Support for {0} images not yet implemented")]
    UnsupportedOs(OsType),

    #[error("Failed to read template {path}: {source}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write rendered template {path}: {source}")]
    TemplateWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Token '{0}' does not appear in the template")]
    UnusedToken(String),

    #[error("Unresolved placeholder left after rendering: {0}")]
    UnresolvedPlaceholder(String),

    #[error("Invalid version '{0}': expected 1 to 4 dot-separated numbers")]
    InvalidVersion(String),

    #[error("No installers found for version '{0}'")]
    VersionNotFound(String),

    #[error("Version {version} has no {platform} installer")]
    MissingInstaller { version: String, platform: String },

    #[error("Invalid installer index: {0}")]
    InstallerIndex(String),

    #[error("Failed to stage asset {path}: {source}")]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid logical id '{0}': only ASCII letters and digits are allowed")]
    InvalidLogicalId(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
