//! CLI output formatting

use crate::assembler::PipelineDescriptors;
use crate::core::config::ConfigWarning;
use crate::core::ResourceRef;
use crate::version::ProductInstallers;
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");

/// Format a configuration warning for display
pub fn format_warning(warning: &ConfigWarning) -> String {
    format!("{} {}", WARN, style(warning).yellow())
}

fn format_ref(reference: &ResourceRef) -> String {
    match reference {
        ResourceRef::Local(id) => style(id).cyan().to_string(),
        ResourceRef::Arn(arn) => style(arn).dim().to_string(),
    }
}

/// Summarize an assembled pipeline
pub fn format_descriptors(descriptors: &PipelineDescriptors) -> String {
    let pipeline = &descriptors.pipeline.properties;
    let recipe = &descriptors.recipe.properties;

    let mut lines = vec![
        format!(
            "  Pipeline: {} ({})",
            style(&pipeline.name).bold(),
            style(&descriptors.pipeline.logical_id).cyan()
        ),
        format!(
            "  Schedule: {} [{}]",
            style(&pipeline.schedule.schedule_expression).cyan(),
            style(format!("{:?}", pipeline.schedule.start_condition)).dim()
        ),
        format!(
            "  Infrastructure: {}",
            style(&descriptors.infrastructure.properties.name).bold()
        ),
        format!(
            "  Recipe: {} v{} from {}",
            style(&recipe.name).bold(),
            recipe.version,
            style(&recipe.parent_image).cyan()
        ),
    ];

    for (i, component) in recipe.components.iter().enumerate() {
        lines.push(format!("    {}. {}", i + 1, format_ref(component)));
    }

    lines.push(format!(
        "  Deadline {} from {}",
        style(&descriptors.deadline_version).green(),
        style(descriptors.installer.s3_uri()).dim()
    ));

    lines.join("\n")
}

/// Format resolved installers for display
pub fn format_installers(installers: &ProductInstallers) -> String {
    let mut lines = vec![format!("{} Deadline {}", INFO, style(&installers.version).bold())];

    for (platform, found) in [("Linux", &installers.linux), ("Windows", &installers.windows)] {
        match found {
            Some(platform_installers) => {
                lines.push(format!(
                    "  {} client: {}",
                    platform,
                    style(platform_installers.client.s3_uri()).cyan()
                ));
                if let Some(repository) = &platform_installers.repository {
                    lines.push(format!(
                        "  {} repository: {}",
                        platform,
                        style(repository.s3_uri()).cyan()
                    ));
                }
            }
            None => lines.push(format!("  {} {}", platform, style("not published").dim())),
        }
    }

    lines.join("\n")
}
