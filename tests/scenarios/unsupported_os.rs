//! Test: Windows requests never produce descriptors

use crate::helpers::*;
use render_farm_image::core::config::FarmConfig;
use render_farm_image::core::{
    DistributionConfig, InfrastructureConfig, OsType, PipelineRequest, Schedule, StartCondition,
};
use render_farm_image::error::PipelineError;

#[test]
fn test_windows_rejected_with_defaults() {
    let mut fixture = Fixture::new();
    let request = PipelineRequest::new(OsType::Windows, "ami-07dd19a7900a1f049");

    let result = fixture.assemble(&request);

    assert!(matches!(result, Err(PipelineError::UnsupportedOs(OsType::Windows))));
    assert!(fixture.stager.manifest().is_empty());
}

/// Whatever else is set, Windows still fails first
#[test]
fn test_windows_rejected_with_every_override() {
    let mut fixture = Fixture::new();
    let request = PipelineRequest::new(OsType::Windows, "not-even-an-ami")
        .with_components(["arn:extra:1", "arn:extra:1"])
        .with_deadline_version("no.such.version")
        .with_schedule(Schedule::new(
            StartCondition::ExpressionMatchAndDependencyUpdatesAvailable,
            "cron(0 0 * * 0)",
        ))
        .with_infrastructure(InfrastructureConfig::new("Custom", "CustomProfile"))
        .with_distribution(DistributionConfig {
            name: "Dist".to_string(),
            description: None,
            distributions: vec![],
        });

    let result = fixture.assemble(&request);

    // An invalid version would fail resolution; Windows must fail before that
    assert!(matches!(result, Err(PipelineError::UnsupportedOs(OsType::Windows))));
    assert!(!fixture.stager.scratch_dir().exists());
}

#[test]
fn test_windows_from_config() {
    let yaml = r#"
os_type: Windows
parent_ami: "ami-1"
installer_index: "installers.json"
"#;
    let config = FarmConfig::from_yaml(yaml).unwrap();
    let mut fixture = Fixture::new();

    let err = fixture.assemble(&config.to_request()).unwrap_err();
    assert_eq!(err.to_string(), "Support for Windows images not yet implemented");
}
