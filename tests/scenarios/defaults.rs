//! Test: schedule and infrastructure defaults

use crate::helpers::*;
use render_farm_image::assembler::{DEFAULT_INFRASTRUCTURE_NAME, DEFAULT_INSTANCE_PROFILE};
use render_farm_image::core::{
    InfrastructureConfig, OsType, PipelineRequest, Schedule, StartCondition, DEFAULT_SCHEDULE,
};

#[test]
fn test_default_schedule_is_weekly_monday() {
    let mut fixture = Fixture::new();
    let descriptors = fixture
        .assemble(&PipelineRequest::new(OsType::Linux, "ami-1"))
        .unwrap();

    let schedule = &descriptors.pipeline.properties.schedule;
    assert_eq!(schedule, &DEFAULT_SCHEDULE);
    assert_eq!(schedule.schedule_expression, "cron(0 10 * * 1)");
    assert_eq!(schedule.start_condition, StartCondition::ExpressionMatchOnly);
}

#[test]
fn test_schedule_override_used_verbatim() {
    let mut fixture = Fixture::new();
    let custom = Schedule::new(
        StartCondition::ExpressionMatchAndDependencyUpdatesAvailable,
        "cron(30 2 * * ? *)",
    );
    let request = PipelineRequest::new(OsType::Linux, "ami-1").with_schedule(custom.clone());

    let descriptors = fixture.assemble(&request).unwrap();
    assert_eq!(descriptors.pipeline.properties.schedule, custom);
}

#[test]
fn test_default_infrastructure_profile() {
    let mut fixture = Fixture::new();
    let descriptors = fixture
        .assemble(&PipelineRequest::new(OsType::Linux, "ami-1"))
        .unwrap();

    let infrastructure = &descriptors.infrastructure.properties;
    assert_eq!(infrastructure.instance_profile_name, DEFAULT_INSTANCE_PROFILE);
    assert_eq!(infrastructure.instance_profile_name, "EC2InstanceProfileForImageBuilder");
    assert_eq!(infrastructure.name, DEFAULT_INFRASTRUCTURE_NAME);
    assert_eq!(
        descriptors.pipeline.properties.infrastructure_configuration_arn,
        descriptors.infrastructure.arn()
    );
}

#[test]
fn test_infrastructure_override_used() {
    let mut fixture = Fixture::new();
    let mut custom = InfrastructureConfig::new("BigBuilders", "BuilderProfile");
    custom.instance_types = vec!["m5.2xlarge".to_string()];
    let request = PipelineRequest::new(OsType::Linux, "ami-1").with_infrastructure(custom.clone());

    let descriptors = fixture.assemble(&request).unwrap();
    assert_eq!(descriptors.infrastructure.properties, custom);
}

#[test]
fn test_latest_version_when_unspecified() {
    let mut fixture = Fixture::new();
    let descriptors = fixture
        .assemble(&PipelineRequest::new(OsType::Linux, "ami-1"))
        .unwrap();

    assert_eq!(descriptors.deadline_version, "10.1.12.1");
    assert_eq!(descriptors.installer.bucket, "thinkbox-installers");
}
