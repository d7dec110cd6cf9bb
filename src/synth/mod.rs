//! CloudFormation template synthesis
//!
//! Turns assembled descriptors into the template document and asset manifest
//! that the provisioning engine consumes.

use crate::assembler::PipelineDescriptors;
use crate::core::descriptors::{CfnResource, Resource};
use crate::error::PipelineResult;
use crate::staging::StagedAsset;
use chrono::Utc;
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use tracing::info;

pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

const DESCRIPTION: &str = "EC2 Image Builder pipeline for Deadline render farm worker images";

/// Files written by [`write`]
#[derive(Debug, Clone)]
pub struct SynthOutput {
    pub template_path: PathBuf,
    pub manifest_path: PathBuf,
}

fn resource_entry<T: CfnResource>(resource: &Resource<T>) -> PipelineResult<Value> {
    Ok(json!({
        "Type": resource.resource_type(),
        "Properties": serde_json::to_value(&resource.properties)?,
    }))
}

fn get_att_arn(resource_id: &str) -> Value {
    json!({ "Fn::GetAtt": [resource_id, "Arn"] })
}

/// Build the CloudFormation template for an assembled pipeline
pub fn synthesize(descriptors: &PipelineDescriptors) -> PipelineResult<Value> {
    let mut resources = Map::new();

    resources.insert(
        descriptors.infrastructure.logical_id.to_string(),
        resource_entry(&descriptors.infrastructure)?,
    );
    if let Some(distribution) = &descriptors.distribution {
        resources.insert(distribution.logical_id.to_string(), resource_entry(distribution)?);
    }

    let mut component = resource_entry(&descriptors.component)?;
    component["Metadata"] = json!({
        "AssetId": descriptors.component_document_id.as_str(),
        "AssetHash": descriptors.component_document.hash,
        "DeadlineVersion": descriptors.deadline_version,
    });
    resources.insert(descriptors.component.logical_id.to_string(), component);

    resources.insert(
        descriptors.recipe.logical_id.to_string(),
        resource_entry(&descriptors.recipe)?,
    );
    resources.insert(
        descriptors.pipeline.logical_id.to_string(),
        resource_entry(&descriptors.pipeline)?,
    );

    let outputs = json!({
        "ImagePipelineArn": { "Value": get_att_arn(descriptors.pipeline.logical_id.as_str()) },
        "ImageRecipeArn": { "Value": get_att_arn(descriptors.recipe.logical_id.as_str()) },
        "DeadlineComponentArn": { "Value": get_att_arn(descriptors.component.logical_id.as_str()) },
    });

    Ok(json!({
        "AWSTemplateFormatVersion": TEMPLATE_FORMAT_VERSION,
        "Description": DESCRIPTION,
        "Resources": Value::Object(resources),
        "Outputs": outputs,
    }))
}

/// Asset manifest listing what must be uploaded before deployment
pub fn asset_manifest(assets: &[StagedAsset]) -> Value {
    json!({
        "generatedAt": Utc::now().to_rfc3339(),
        "assets": assets,
    })
}

/// Write `<name>.template.json` and `assets.json` into `out_dir`
pub fn write(
    out_dir: &Path,
    name: &str,
    descriptors: &PipelineDescriptors,
    assets: &[StagedAsset],
) -> anyhow::Result<SynthOutput> {
    use anyhow::Context;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let template = synthesize(descriptors)?;
    let template_path = out_dir.join(format!("{}.template.json", name));
    std::fs::write(&template_path, serde_json::to_string_pretty(&template)?)
        .with_context(|| format!("Failed to write {}", template_path.display()))?;

    let manifest_path = out_dir.join("assets.json");
    std::fs::write(&manifest_path, serde_json::to_string_pretty(&asset_manifest(assets))?)
        .with_context(|| format!("Failed to write {}", manifest_path.display()))?;

    info!(
        template = %template_path.display(),
        assets = assets.len(),
        "Synthesized image pipeline template"
    );

    Ok(SynthOutput {
        template_path,
        manifest_path,
    })
}
