//! Test: end-to-end assembly and synthesis

use crate::helpers::*;
use render_farm_image::core::config::FarmConfig;
use render_farm_image::core::{OsType, PipelineRequest, DEFAULT_SCHEDULE};
use render_farm_image::synth;
use serde_json::json;

#[test]
fn test_worker_image_from_ami() {
    let mut fixture = Fixture::new();
    let request = PipelineRequest::new(OsType::Linux, "ami-07dd19a7900a1f049");

    let descriptors = fixture.assemble(&request).unwrap();

    assert_eq!(descriptors.recipe.properties.parent_image, "ami-07dd19a7900a1f049");
    assert_recipe_components(&descriptors, &[]);
    assert_eq!(descriptors.pipeline.properties.schedule, DEFAULT_SCHEDULE);
    assert_eq!(
        descriptors.pipeline.properties.image_recipe_arn,
        descriptors.recipe.arn()
    );
}

#[test]
fn test_worker_image_with_extra_components() {
    let mut fixture = Fixture::new();
    let request = PipelineRequest::new(OsType::Linux, "ami-07dd19a7900a1f049")
        .with_components(["arn:extra:1", "arn:extra:2"]);

    let descriptors = fixture.assemble(&request).unwrap();
    assert_recipe_components(&descriptors, &["arn:extra:1", "arn:extra:2"]);
}

#[test]
fn test_parent_image_arn_passed_through() {
    let mut fixture = Fixture::new();
    let parent = "arn:aws:imagebuilder:us-west-2:123456789123:image/my-image/x.x.x";
    let descriptors = fixture
        .assemble(&PipelineRequest::new(OsType::Linux, parent))
        .unwrap();

    assert_eq!(descriptors.recipe.properties.parent_image, parent);
}

#[test]
fn test_config_to_template() {
    let fixture = Fixture::new();
    let index_path = fixture.dir.path().join("installers.json");
    std::fs::write(&index_path, INSTALLER_INDEX).unwrap();

    let config_path = fixture.dir.path().join("farm.yaml");
    std::fs::write(
        &config_path,
        r#"
parent_ami: "ami-07dd19a7900a1f049"
installer_index: "installers.json"
component_arns: ["arn:extra:1"]
component_version: "1.0.3"
recipe_version: "1.0.4"
key_pair_name: "farm-key"
deadline_client_linux_ami_map:
  us-west-2: "ami-0123456789abcdef0"
asset_bucket: "farm-assets"
"#,
    )
    .unwrap();

    let config = FarmConfig::from_file(&config_path).unwrap();
    let warnings = config.validate().unwrap();
    assert_eq!(warnings.len(), 1);

    let index = render_farm_image::InstallerIndex::from_file(&config.installer_index).unwrap();
    let out_dir = fixture.dir.path().join("cdk.out");
    let mut stager = render_farm_image::AssetStager::new(&out_dir, &config.asset_bucket);
    let descriptors = render_farm_image::ImageBuilderPipeline::new(&index, &mut stager)
        .with_template(config.component_template())
        .assemble(&config.to_request())
        .unwrap();

    let output = synth::write(&out_dir, "PocImageStack", &descriptors, stager.manifest()).unwrap();
    let template: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output.template_path).unwrap()).unwrap();

    let resources = &template["Resources"];
    assert_eq!(resources["DeadlineComponent"]["Properties"]["Version"], "1.0.3");
    assert_eq!(resources["DeadlineRecipe"]["Properties"]["Version"], "1.0.4");
    assert_eq!(
        resources["DeadlineRecipe"]["Properties"]["Components"][1],
        json!({ "ComponentArn": "arn:extra:1" })
    );
    assert_eq!(
        resources["DeadlinePipeline"]["Properties"]["Schedule"],
        json!({
            "PipelineExecutionStartCondition": "EXPRESSION_MATCH_ONLY",
            "ScheduleExpression": "cron(0 10 * * 1)",
        })
    );
    assert_eq!(
        resources["InfrastructureConfig"]["Properties"]["InstanceProfileName"],
        "EC2InstanceProfileForImageBuilder"
    );
}
