//! Declarative Image Builder resource descriptors
//!
//! Descriptors serialize straight to CloudFormation property blocks
//! (PascalCase). The ones that can also be supplied as overrides in the farm
//! configuration deserialize from snake_case YAML.

use crate::core::{request::Platform, schedule::Schedule};
use crate::error::PipelineError;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Template-local identifier of a resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LogicalId(String);

impl LogicalId {
    /// Build a logical id, rejecting anything CloudFormation would refuse
    pub fn new(id: impl Into<String>) -> Result<Self, PipelineError> {
        let id = id.into();
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(PipelineError::InvalidLogicalId(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to a resource's ARN
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRef {
    /// A resource defined in the same template
    Local(LogicalId),
    /// A resource that already exists
    Arn(String),
}

impl ResourceRef {
    pub fn arn(arn: impl Into<String>) -> Self {
        ResourceRef::Arn(arn.into())
    }

    pub fn logical_id(&self) -> Option<&LogicalId> {
        match self {
            ResourceRef::Local(id) => Some(id),
            ResourceRef::Arn(_) => None,
        }
    }
}

impl Serialize for ResourceRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ResourceRef::Local(id) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::GetAtt", &[id.as_str(), "Arn"])?;
                map.end()
            }
            ResourceRef::Arn(arn) => serializer.serialize_str(arn),
        }
    }
}

/// CloudFormation resource type of a descriptor
pub trait CfnResource: Serialize {
    const TYPE: &'static str;
}

/// A descriptor bound to its logical id
#[derive(Debug, Clone, PartialEq)]
pub struct Resource<T> {
    pub logical_id: LogicalId,
    pub properties: T,
}

impl<T: CfnResource> Resource<T> {
    pub fn new(logical_id: LogicalId, properties: T) -> Self {
        Self { logical_id, properties }
    }

    /// Reference to this resource's ARN
    pub fn arn(&self) -> ResourceRef {
        ResourceRef::Local(self.logical_id.clone())
    }

    pub fn resource_type(&self) -> &'static str {
        T::TYPE
    }
}

/// Compute environment used to run image builds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase", deserialize = "snake_case"))]
pub struct InfrastructureConfig {
    pub name: String,

    pub instance_profile_name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instance_types: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security_group_ids: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminate_instance_on_failure: Option<bool>,
}

impl InfrastructureConfig {
    pub fn new(name: impl Into<String>, instance_profile_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instance_profile_name: instance_profile_name.into(),
            instance_types: Vec::new(),
            subnet_id: None,
            security_group_ids: Vec::new(),
            terminate_instance_on_failure: None,
        }
    }
}

impl CfnResource for InfrastructureConfig {
    const TYPE: &'static str = "AWS::ImageBuilder::InfrastructureConfiguration";
}

/// Where built images are copied and who may launch them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase", deserialize = "snake_case"))]
pub struct DistributionConfig {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub distributions: Vec<Distribution>,
}

impl CfnResource for DistributionConfig {
    const TYPE: &'static str = "AWS::ImageBuilder::DistributionConfiguration";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase", deserialize = "snake_case"))]
pub struct Distribution {
    pub region: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ami_distribution_configuration: Option<AmiDistribution>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase", deserialize = "snake_case"))]
pub struct AmiDistribution {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_account_ids: Vec<String>,
}

/// A versioned unit of installation instructions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SoftwareComponent {
    pub name: String,
    pub platform: Platform,
    pub version: String,
    /// Storage URI of the component document
    pub uri: String,
    pub description: String,
}

impl CfnResource for SoftwareComponent {
    const TYPE: &'static str = "AWS::ImageBuilder::Component";
}

/// Parent image plus the ordered components layered onto it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageRecipe {
    pub name: String,
    #[serde(serialize_with = "serialize_components")]
    pub components: Vec<ResourceRef>,
    pub parent_image: String,
    pub version: String,
}

impl CfnResource for ImageRecipe {
    const TYPE: &'static str = "AWS::ImageBuilder::ImageRecipe";
}

fn serialize_components<S: Serializer>(
    components: &[ResourceRef],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct ComponentConfiguration<'a> {
        #[serde(rename = "ComponentArn")]
        component_arn: &'a ResourceRef,
    }

    let mut seq = serializer.serialize_seq(Some(components.len()))?;
    for component_arn in components {
        seq.serialize_element(&ComponentConfiguration { component_arn })?;
    }
    seq.end()
}

/// Scheduled process tying recipe and infrastructure together
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImagePipeline {
    pub name: String,
    pub image_recipe_arn: ResourceRef,
    pub infrastructure_configuration_arn: ResourceRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution_configuration_arn: Option<ResourceRef>,
    pub schedule: Schedule,
}

impl CfnResource for ImagePipeline {
    const TYPE: &'static str = "AWS::ImageBuilder::ImagePipeline";
}
