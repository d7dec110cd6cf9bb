//! Test: component template substitution

use crate::helpers::*;
use render_farm_image::assembler::bundled_component_template;
use render_farm_image::core::{OsType, PipelineRequest};
use render_farm_image::template::{placeholder, render, render_str, RenderMode, TokenMap};

fn version_token(value: &str) -> TokenMap {
    let mut tokens = TokenMap::new();
    tokens.insert("version".to_string(), value.to_string());
    tokens
}

/// Only the token occurrence changes; every other byte is kept
#[test]
fn test_bundled_template_substitution_is_exact() {
    let template = std::fs::read_to_string(bundled_component_template()).unwrap();
    assert_eq!(template.matches(&placeholder("version")).count(), 1);

    let value = "thinkbox-installers/Deadline/10.1.12.1/Linux/client.run";
    let rendered = render_str(&template, &version_token(value), RenderMode::Strict).unwrap();

    assert_eq!(rendered, template.replacen("${version}", value, 1));
}

#[test]
fn test_rendering_rendered_text_is_noop() {
    let template = std::fs::read_to_string(bundled_component_template()).unwrap();
    let tokens = version_token("bucket/key");

    let once = render_str(&template, &tokens, RenderMode::Lenient).unwrap();
    let twice = render_str(&once, &tokens, RenderMode::Lenient).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_staged_document_holds_resolved_installer() {
    let mut fixture = Fixture::new();
    let request = PipelineRequest::new(OsType::Linux, "ami-1").with_deadline_version("10.1.11");

    let descriptors = fixture.assemble(&request).unwrap();
    let document = std::fs::read_to_string(&descriptors.component_document.local_path).unwrap();

    assert!(document.contains(
        "s3://thinkbox-installers/Deadline/10.1.11.5/Linux/DeadlineClient-10.1.11.5-linux-x64-installer.run"
    ));
    assert!(descriptors
        .component
        .properties
        .uri
        .starts_with("s3://farm-assets/assets/"));
}

#[test]
fn test_same_version_stages_same_document() {
    let mut fixture = Fixture::new();
    let request = PipelineRequest::new(OsType::Linux, "ami-1");

    let first = fixture.assemble(&request).unwrap();
    let second = fixture.assemble(&request).unwrap();

    assert_eq!(first.component.properties.uri, second.component.properties.uri);
    assert_eq!(fixture.stager.manifest().len(), 1);
}

#[test]
fn test_render_file_leaves_template_untouched() {
    let fixture = Fixture::new();
    let template_path = fixture.dir.path().join("custom.template");
    std::fs::write(&template_path, "a ${version} b ${other}").unwrap();

    let output = render(
        &template_path,
        &version_token("v"),
        &fixture.dir.path().join("rendered"),
        RenderMode::Lenient,
    )
    .unwrap();

    assert_eq!(std::fs::read_to_string(&output).unwrap(), "a v b ${other}");
    assert_eq!(
        std::fs::read_to_string(&template_path).unwrap(),
        "a ${version} b ${other}"
    );
}
