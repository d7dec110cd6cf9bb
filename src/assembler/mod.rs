//! Image pipeline assembly
//!
//! Expands a [`PipelineRequest`] into the Image Builder resources that bake a
//! worker image with the Deadline client installed:
//!
//! ```text
//! ImagePipeline ──> ImageRecipe ──> [Deadline component, extra components...]
//!       └─────────> InfrastructureConfiguration
//!       └─────────> DistributionConfiguration (optional)
//! ```

use crate::core::{
    descriptors::{
        DistributionConfig, ImagePipeline, ImageRecipe, InfrastructureConfig, LogicalId,
        Resource, ResourceRef, SoftwareComponent,
    },
    request::{Platform, PipelineRequest},
    schedule::DEFAULT_SCHEDULE,
};
use crate::error::{PipelineError, PipelineResult};
use crate::staging::{AssetStager, StagedAsset};
use crate::template::{self, RenderMode, TokenMap};
use crate::version::{InstallerLocation, VersionResolver};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the infrastructure configuration created when none is supplied
pub const DEFAULT_INFRASTRUCTURE_NAME: &str = "DeadlineInfrastructureConfig";

/// Instance profile Image Builder documents as its default
pub const DEFAULT_INSTANCE_PROFILE: &str = "EC2InstanceProfileForImageBuilder";

pub const COMPONENT_NAME: &str = "Deadline";
pub const COMPONENT_DESCRIPTION: &str = "Installs Deadline";
pub const RECIPE_NAME: &str = "DeadlineInstallationRecipe";
pub const PIPELINE_NAME: &str = "DeadlineInstallationPipeline";

/// Token in the component template replaced by the installer's `bucket/key`
pub const VERSION_TOKEN: &str = "version";

/// Component template shipped with the crate
pub fn bundled_component_template() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("components")
        .join("deadline.component.template")
}

/// Base logical ids; the assembler's prefix is prepended to each
mod ids {
    pub const INFRASTRUCTURE: &str = "InfrastructureConfig";
    pub const DISTRIBUTION: &str = "DistributionConfig";
    pub const COMPONENT_DOC: &str = "DeadlineComponentDoc";
    pub const COMPONENT: &str = "DeadlineComponent";
    pub const RECIPE: &str = "DeadlineRecipe";
    pub const PIPELINE: &str = "DeadlinePipeline";
}

/// The assembled resource graph
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineDescriptors {
    pub infrastructure: Resource<InfrastructureConfig>,
    pub distribution: Option<Resource<DistributionConfig>>,
    /// Logical id of the uploaded component document
    pub component_document_id: LogicalId,
    pub component_document: StagedAsset,
    pub component: Resource<SoftwareComponent>,
    pub recipe: Resource<ImageRecipe>,
    pub pipeline: Resource<ImagePipeline>,
    /// Deadline version the component installs
    pub deadline_version: String,
    pub installer: InstallerLocation,
}

/// Builds image pipelines for the Deadline worker image
pub struct ImageBuilderPipeline<'a, R: VersionResolver> {
    resolver: &'a R,
    stager: &'a mut AssetStager,
    template_path: PathBuf,
    id_prefix: String,
}

impl<'a, R: VersionResolver> ImageBuilderPipeline<'a, R> {
    pub fn new(resolver: &'a R, stager: &'a mut AssetStager) -> Self {
        Self {
            resolver,
            stager,
            template_path: bundled_component_template(),
            id_prefix: String::new(),
        }
    }

    /// Use a different component template
    pub fn with_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = path.into();
        self
    }

    /// Prefix every logical id, e.g. to place two pipelines in one template
    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    fn id(&self, base: &str) -> PipelineResult<LogicalId> {
        LogicalId::new(format!("{}{}", self.id_prefix, base))
    }

    /// Expand `request` into the pipeline's resources
    ///
    /// Nothing is returned unless every step succeeds.
    pub fn assemble(&mut self, request: &PipelineRequest) -> PipelineResult<PipelineDescriptors> {
        // Windows is rejected here, before anything touches the filesystem
        let platform = Platform::try_from(request.os_type)?;

        let schedule = request.schedule.clone().unwrap_or(DEFAULT_SCHEDULE);

        let infrastructure = Resource::new(
            self.id(ids::INFRASTRUCTURE)?,
            request.infrastructure.clone().unwrap_or_else(|| {
                InfrastructureConfig::new(DEFAULT_INFRASTRUCTURE_NAME, DEFAULT_INSTANCE_PROFILE)
            }),
        );

        let distribution = match &request.distribution {
            Some(config) => Some(Resource::new(self.id(ids::DISTRIBUTION)?, config.clone())),
            None => None,
        };

        let installers = self.resolver.resolve(request.deadline_version.as_deref())?;
        let installer = installers.require_linux()?.client.clone();
        info!(
            version = %installers.version,
            installer = %installer.s3_uri(),
            "Resolved Deadline client installer"
        );

        let component_document = self.render_component_document(&installer)?;

        let component = Resource::new(
            self.id(ids::COMPONENT)?,
            SoftwareComponent {
                name: COMPONENT_NAME.to_string(),
                platform,
                version: request.component_version.clone(),
                uri: component_document.s3_url(),
                description: COMPONENT_DESCRIPTION.to_string(),
            },
        );

        let components: Vec<ResourceRef> = std::iter::once(component.arn())
            .chain(request.component_arns.iter().map(|arn| ResourceRef::arn(arn.as_str())))
            .collect();

        let recipe = Resource::new(
            self.id(ids::RECIPE)?,
            ImageRecipe {
                name: RECIPE_NAME.to_string(),
                components,
                parent_image: request.parent_image.clone(),
                version: request.recipe_version.clone(),
            },
        );

        let pipeline = Resource::new(
            self.id(ids::PIPELINE)?,
            ImagePipeline {
                name: PIPELINE_NAME.to_string(),
                image_recipe_arn: recipe.arn(),
                infrastructure_configuration_arn: infrastructure.arn(),
                distribution_configuration_arn: distribution.as_ref().map(Resource::arn),
                schedule,
            },
        );

        debug!(
            pipeline = %pipeline.logical_id,
            components = recipe.properties.components.len(),
            "Assembled image pipeline"
        );

        Ok(PipelineDescriptors {
            infrastructure,
            distribution,
            component_document_id: self.id(ids::COMPONENT_DOC)?,
            component_document,
            component,
            recipe,
            pipeline,
            deadline_version: installers.version,
            installer,
        })
    }

    fn render_component_document(
        &mut self,
        installer: &InstallerLocation,
    ) -> PipelineResult<StagedAsset> {
        let mut tokens = TokenMap::new();
        tokens.insert(VERSION_TOKEN.to_string(), installer.bucket_path());

        // Removed on drop, whether or not staging succeeds
        let scratch = self.stager.scratch_dir();
        let render_dir = std::fs::create_dir_all(&scratch)
            .and_then(|_| tempfile::Builder::new().prefix("render-").tempdir_in(&scratch))
            .map_err(|source| PipelineError::TemplateWrite {
                path: scratch.clone(),
                source,
            })?;

        let rendered = template::render(
            &self.template_path,
            &tokens,
            render_dir.path(),
            RenderMode::Strict,
        )?;
        self.stager.stage(&rendered)
    }
}
