//! Test utility functions for pipeline assembly scenarios

use render_farm_image::assembler::{ImageBuilderPipeline, PipelineDescriptors};
use render_farm_image::core::{LogicalId, PipelineRequest, ResourceRef};
use render_farm_image::error::PipelineResult;
use render_farm_image::staging::AssetStager;
use render_farm_image::version::InstallerIndex;
use tempfile::TempDir;

/// Installer index with two Linux releases and one Windows-only release
pub const INSTALLER_INDEX: &str = r#"{
    "bucket": "thinkbox-installers",
    "versions": {
        "10.1.11.5": {
            "linux": { "client": "Deadline/10.1.11.5/Linux/DeadlineClient-10.1.11.5-linux-x64-installer.run" }
        },
        "10.1.12.1": {
            "linux": {
                "client": "Deadline/10.1.12.1/Linux/DeadlineClient-10.1.12.1-linux-x64-installer.run",
                "repository": "Deadline/10.1.12.1/Linux/DeadlineRepository-10.1.12.1-linux-x64-installer.run"
            }
        },
        "10.0.28.2": {
            "windows": { "client": "Deadline/10.0.28.2/Windows/DeadlineClient-10.0.28.2-windows-installer.exe" }
        }
    }
}"#;

/// Isolated output directory plus the collaborators an assembly needs
pub struct Fixture {
    pub dir: TempDir,
    pub index: InstallerIndex,
    pub stager: AssetStager,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let index = InstallerIndex::from_json(INSTALLER_INDEX).expect("parse installer index");
        let stager = AssetStager::new(dir.path().join("cdk.out"), "farm-assets");
        Self { dir, index, stager }
    }

    /// Assemble with the bundled component template
    pub fn assemble(&mut self, request: &PipelineRequest) -> PipelineResult<PipelineDescriptors> {
        ImageBuilderPipeline::new(&self.index, &mut self.stager).assemble(request)
    }
}

/// Reference to the built-in Deadline component
pub fn builtin_component() -> ResourceRef {
    ResourceRef::Local(LogicalId::new("DeadlineComponent").unwrap())
}

/// Assert the recipe holds exactly the built-in component followed by `extra`
pub fn assert_recipe_components(descriptors: &PipelineDescriptors, extra: &[&str]) {
    let mut expected = vec![builtin_component()];
    expected.extend(extra.iter().map(|arn| ResourceRef::arn(*arn)));
    assert_eq!(
        descriptors.recipe.properties.components, expected,
        "recipe components out of order"
    );
}
