//! Pipeline request - the input to assembly

use crate::core::{
    descriptors::{DistributionConfig, InfrastructureConfig},
    schedule::Schedule,
};
use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating system requested for the worker image
///
/// Both variants can be requested, but only [`Platform`] values can be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OsType {
    Windows,
    #[default]
    Linux,
}

impl fmt::Display for OsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsType::Windows => write!(f, "Windows"),
            OsType::Linux => write!(f, "Linux"),
        }
    }
}

/// A platform with an implemented image recipe path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Platform {
    Linux,
}

impl Platform {
    /// Platform name as Image Builder expects it
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linux => "Linux",
        }
    }
}

impl TryFrom<OsType> for Platform {
    type Error = PipelineError;

    fn try_from(os: OsType) -> Result<Self, Self::Error> {
        match os {
            OsType::Linux => Ok(Platform::Linux),
            OsType::Windows => Err(PipelineError::UnsupportedOs(os)),
        }
    }
}

/// Version applied to the built-in component and recipe when none is given
pub const DEFAULT_RESOURCE_VERSION: &str = "1.0.0";

/// Everything needed to assemble one image pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRequest {
    pub os_type: OsType,

    /// AMI id or image ARN; passed through to the recipe untouched
    pub parent_image: String,

    /// Extra component ARNs, applied after the built-in component in this order
    pub component_arns: Vec<String>,

    /// Deadline version to install; `None` means latest
    pub deadline_version: Option<String>,

    pub component_version: String,
    pub recipe_version: String,

    pub distribution: Option<DistributionConfig>,
    pub infrastructure: Option<InfrastructureConfig>,
    pub schedule: Option<Schedule>,
}

impl PipelineRequest {
    pub fn new(os_type: OsType, parent_image: impl Into<String>) -> Self {
        Self {
            os_type,
            parent_image: parent_image.into(),
            component_arns: Vec::new(),
            deadline_version: None,
            component_version: DEFAULT_RESOURCE_VERSION.to_string(),
            recipe_version: DEFAULT_RESOURCE_VERSION.to_string(),
            distribution: None,
            infrastructure: None,
            schedule: None,
        }
    }

    pub fn with_component(mut self, arn: impl Into<String>) -> Self {
        self.component_arns.push(arn.into());
        self
    }

    pub fn with_components<I, S>(mut self, arns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.component_arns.extend(arns.into_iter().map(Into::into));
        self
    }

    pub fn with_deadline_version(mut self, version: impl Into<String>) -> Self {
        self.deadline_version = Some(version.into());
        self
    }

    pub fn with_component_version(mut self, version: impl Into<String>) -> Self {
        self.component_version = version.into();
        self
    }

    pub fn with_recipe_version(mut self, version: impl Into<String>) -> Self {
        self.recipe_version = version.into();
        self
    }

    pub fn with_distribution(mut self, distribution: DistributionConfig) -> Self {
        self.distribution = Some(distribution);
        self
    }

    pub fn with_infrastructure(mut self, infrastructure: InfrastructureConfig) -> Self {
        self.infrastructure = Some(infrastructure);
        self
    }

    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = Some(schedule);
        self
    }
}
