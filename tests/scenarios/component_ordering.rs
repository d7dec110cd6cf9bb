//! Test: built-in component first, caller components after in input order

use crate::helpers::*;
use render_farm_image::core::{OsType, PipelineRequest};

#[test]
fn test_no_extra_components() {
    let mut fixture = Fixture::new();
    let descriptors = fixture
        .assemble(&PipelineRequest::new(OsType::Linux, "ami-1"))
        .unwrap();

    assert_recipe_components(&descriptors, &[]);
}

#[test]
fn test_extra_components_keep_order() {
    let mut fixture = Fixture::new();
    let arns = ["arn:extra:3", "arn:extra:1", "arn:extra:2"];
    let request = PipelineRequest::new(OsType::Linux, "ami-1").with_components(arns);

    let descriptors = fixture.assemble(&request).unwrap();
    assert_recipe_components(&descriptors, &arns);
}

#[test]
fn test_duplicates_are_kept() {
    let mut fixture = Fixture::new();
    let arns = ["arn:extra:1", "arn:extra:1", "arn:extra:2", "arn:extra:1"];
    let request = PipelineRequest::new(OsType::Linux, "ami-1").with_components(arns);

    let descriptors = fixture.assemble(&request).unwrap();
    assert_eq!(descriptors.recipe.properties.components.len(), 5);
    assert_recipe_components(&descriptors, &arns);
}

#[test]
fn test_builtin_component_ref_points_at_component() {
    let mut fixture = Fixture::new();
    let request = PipelineRequest::new(OsType::Linux, "ami-1").with_component("arn:extra:1");

    let descriptors = fixture.assemble(&request).unwrap();
    assert_eq!(
        descriptors.recipe.properties.components[0],
        descriptors.component.arn()
    );
}
