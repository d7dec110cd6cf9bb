//! Render farm configuration from YAML

use crate::assembler::bundled_component_template;
use crate::core::{
    descriptors::{DistributionConfig, InfrastructureConfig},
    request::{OsType, PipelineRequest, DEFAULT_RESOURCE_VERSION},
    schedule::Schedule,
};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Region key left in the example AMI map
const PLACEHOLDER_REGION: &str = "region";
/// AMI value left in the example AMI map
const PLACEHOLDER_AMI: &str = "ami-id";

/// A usage-based license and how many workers may use it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UblLicense {
    pub license: String,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Top-level render farm configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmConfig {
    #[serde(default)]
    pub os_type: OsType,

    /// AMI id or image ARN the worker image is built from
    pub parent_ami: String,

    /// Extra Image Builder components applied after Deadline
    #[serde(default)]
    pub component_arns: Vec<String>,

    /// Deadline version to install (defaults to latest)
    #[serde(default)]
    pub deadline_version: Option<String>,

    #[serde(default = "default_resource_version")]
    pub component_version: String,

    #[serde(default = "default_resource_version")]
    pub recipe_version: String,

    /// EC2 key pair for SSH access to workers
    #[serde(default)]
    pub key_pair_name: Option<String>,

    #[serde(default)]
    pub ubl_licenses: Vec<UblLicense>,

    /// Secret holding the UBL certificates
    #[serde(default)]
    pub ubl_certificates_secret_arn: Option<String>,

    /// Region to worker AMI
    #[serde(default)]
    pub deadline_client_linux_ami_map: BTreeMap<String, String>,

    #[serde(default)]
    pub schedule: Option<Schedule>,

    #[serde(default)]
    pub infrastructure: Option<InfrastructureConfig>,

    #[serde(default)]
    pub distribution: Option<DistributionConfig>,

    /// Installer index used to resolve Deadline versions
    pub installer_index: PathBuf,

    /// Component template (defaults to the bundled Deadline template)
    #[serde(default)]
    pub component_template: Option<PathBuf>,

    /// Bucket that staged assets are uploaded to
    #[serde(default = "default_asset_bucket")]
    pub asset_bucket: String,

    /// Where the template and staged assets are written, relative to the
    /// config file when loaded with [`FarmConfig::from_file`]
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Prefix for every logical id in the synthesized template
    #[serde(default)]
    pub id_prefix: String,
}

fn default_resource_version() -> String {
    DEFAULT_RESOURCE_VERSION.to_string()
}

fn default_asset_bucket() -> String {
    "render-farm-image-assets".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("cdk.out")
}

/// Non-fatal configuration issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConfigWarning {
    NoLicenses,
    NoKeyPair,
    EmptyAmiMap,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::NoLicenses => {
                write!(f, "No UBL licenses specified. UsageBasedLicensing will be skipped.")
            }
            ConfigWarning::NoKeyPair => write!(
                f,
                "EC2 key pair name not specified. You will not have SSH access to the render farm."
            ),
            ConfigWarning::EmptyAmiMap => {
                write!(f, "Deadline Client Linux AMI map is empty.")
            }
        }
    }
}

impl FarmConfig {
    /// Load configuration from a YAML file
    ///
    /// Relative paths inside the file are resolved against its directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config = Self::from_yaml(&content)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: FarmConfig = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        if self.installer_index.is_relative() {
            self.installer_index = base.join(&self.installer_index);
        }
        if self.output_dir.is_relative() {
            self.output_dir = base.join(&self.output_dir);
        }
        if let Some(template) = &self.component_template {
            if template.is_relative() {
                self.component_template = Some(base.join(template));
            }
        }
    }

    /// Check cross-field rules, returning warnings for anything non-fatal
    pub fn validate(&self) -> Result<Vec<ConfigWarning>> {
        let mut warnings = Vec::new();

        let no_secret = self
            .ubl_certificates_secret_arn
            .as_deref()
            .map_or(true, |arn| arn.trim().is_empty());
        if no_secret && !self.ubl_licenses.is_empty() {
            bail!("UBL certificates secret ARN is required when using UBL but was not specified.");
        }

        if self.ubl_licenses.is_empty() {
            warnings.push(ConfigWarning::NoLicenses);
        }

        if self.key_pair_name.as_deref().map_or(true, str::is_empty) {
            warnings.push(ConfigWarning::NoKeyPair);
        }

        if self.deadline_client_linux_ami_map.is_empty() {
            warnings.push(ConfigWarning::EmptyAmiMap);
        } else if self
            .deadline_client_linux_ami_map
            .iter()
            .any(|(region, ami)| region == PLACEHOLDER_REGION || ami == PLACEHOLDER_AMI)
        {
            bail!("Deadline Client Linux AMI map is required but was not specified.");
        }

        if self.parent_ami.trim().is_empty() {
            bail!("parent_ami must not be empty");
        }

        Ok(warnings)
    }

    /// Component template to render
    pub fn component_template(&self) -> PathBuf {
        self.component_template
            .clone()
            .unwrap_or_else(bundled_component_template)
    }

    /// Build the pipeline request this configuration describes
    pub fn to_request(&self) -> PipelineRequest {
        PipelineRequest {
            os_type: self.os_type,
            parent_image: self.parent_ami.clone(),
            component_arns: self.component_arns.clone(),
            deadline_version: self.deadline_version.clone(),
            component_version: self.component_version.clone(),
            recipe_version: self.recipe_version.clone(),
            distribution: self.distribution.clone(),
            infrastructure: self.infrastructure.clone(),
            schedule: self.schedule.clone(),
        }
    }
}
