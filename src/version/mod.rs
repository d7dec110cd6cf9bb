//! Deadline version lookup
//!
//! Resolves a requested Deadline version (or "latest") to the installer
//! objects published for it.

use crate::error::{PipelineError, PipelineResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

/// Request string that always picks the newest release
pub const LATEST: &str = "latest";

/// Location of an installer object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallerLocation {
    pub bucket: String,
    pub object_key: String,
}

impl InstallerLocation {
    /// `bucket/key` form used by S3 download steps
    pub fn bucket_path(&self) -> String {
        format!("{}/{}", self.bucket, self.object_key)
    }

    pub fn s3_uri(&self) -> String {
        format!("s3://{}", self.bucket_path())
    }
}

/// Installers for one platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformInstallers {
    pub client: InstallerLocation,
    pub repository: Option<InstallerLocation>,
}

/// Installers published for one release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductInstallers {
    pub version: String,
    pub linux: Option<PlatformInstallers>,
    pub windows: Option<PlatformInstallers>,
}

impl ProductInstallers {
    /// Linux installers, or an error if this release has none
    pub fn require_linux(&self) -> PipelineResult<&PlatformInstallers> {
        self.linux.as_ref().ok_or_else(|| PipelineError::MissingInstaller {
            version: self.version.clone(),
            platform: "Linux".to_string(),
        })
    }
}

/// Looks up installers for a requested version
pub trait VersionResolver {
    /// `None` and `"latest"` both mean the newest available release
    fn resolve(&self, requested: Option<&str>) -> PipelineResult<ProductInstallers>;
}

/// Dotted numeric version with 1 to 4 components
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductVersion(Vec<u32>);

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+(\.\d+){0,3}$").expect("version pattern is valid"))
}

impl ProductVersion {
    pub fn parse(s: &str) -> PipelineResult<Self> {
        let s = s.trim();
        if !version_pattern().is_match(s) {
            return Err(PipelineError::InvalidVersion(s.to_string()));
        }
        s.split('.')
            .map(|part| part.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map(ProductVersion)
            .map_err(|_| PipelineError::InvalidVersion(s.to_string()))
    }

    /// Whether every component of `prefix` matches the start of this version
    pub fn starts_with(&self, prefix: &ProductVersion) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl Ord for ProductVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for ProductVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ProductVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|p| p.to_string()).collect();
        f.write_str(&parts.join("."))
    }
}

/// Installer index document as published next to the installers
#[derive(Debug, Clone, Deserialize)]
struct IndexDocument {
    bucket: String,
    versions: BTreeMap<String, IndexEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct IndexEntry {
    #[serde(default)]
    linux: Option<IndexPlatform>,
    #[serde(default)]
    windows: Option<IndexPlatform>,
}

#[derive(Debug, Clone, Deserialize)]
struct IndexPlatform {
    client: String,
    #[serde(default)]
    repository: Option<String>,
}

/// Version resolver backed by an installer index
#[derive(Debug, Clone)]
pub struct InstallerIndex {
    bucket: String,
    /// Sorted ascending by version
    releases: Vec<(ProductVersion, IndexEntry)>,
}

impl InstallerIndex {
    pub fn from_file<P: AsRef<Path>>(path: P) -> PipelineResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::InstallerIndex(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> PipelineResult<Self> {
        let doc: IndexDocument = serde_json::from_str(json)?;
        if doc.bucket.is_empty() {
            return Err(PipelineError::InstallerIndex("bucket must not be empty".to_string()));
        }

        let mut releases = doc
            .versions
            .into_iter()
            .map(|(version, entry)| -> PipelineResult<_> {
                Ok((ProductVersion::parse(&version)?, entry))
            })
            .collect::<PipelineResult<Vec<_>>>()?;
        releases.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(Self {
            bucket: doc.bucket,
            releases,
        })
    }

    /// All indexed versions, newest first
    pub fn versions(&self) -> Vec<String> {
        self.releases.iter().rev().map(|(v, _)| v.to_string()).collect()
    }

    fn location(&self, key: &str) -> InstallerLocation {
        InstallerLocation {
            bucket: self.bucket.clone(),
            object_key: key.to_string(),
        }
    }

    fn platform(&self, platform: &Option<IndexPlatform>) -> Option<PlatformInstallers> {
        platform.as_ref().map(|p| PlatformInstallers {
            client: self.location(&p.client),
            repository: p.repository.as_deref().map(|k| self.location(k)),
        })
    }
}

impl VersionResolver for InstallerIndex {
    fn resolve(&self, requested: Option<&str>) -> PipelineResult<ProductInstallers> {
        let requested = requested.map(str::trim).unwrap_or(LATEST);

        let found = if requested.eq_ignore_ascii_case(LATEST) {
            self.releases.last()
        } else {
            let prefix = ProductVersion::parse(requested)?;
            self.releases.iter().rev().find(|(v, _)| v.starts_with(&prefix))
        };

        let (version, entry) =
            found.ok_or_else(|| PipelineError::VersionNotFound(requested.to_string()))?;

        debug!(requested = %requested, resolved = %version, "Resolved Deadline version");

        Ok(ProductInstallers {
            version: version.to_string(),
            linux: self.platform(&entry.linux),
            windows: self.platform(&entry.windows),
        })
    }
}
