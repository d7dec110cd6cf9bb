use anyhow::{Context, Result};
use render_farm_image::assembler::ImageBuilderPipeline;
use render_farm_image::cli::commands::{RenderCommand, ResolveCommand, SynthCommand, ValidateCommand};
use render_farm_image::cli::output::*;
use render_farm_image::cli::{Cli, Command};
use render_farm_image::core::config::FarmConfig;
use render_farm_image::staging::AssetStager;
use render_farm_image::synth;
use render_farm_image::template::{self, RenderMode, TokenMap};
use render_farm_image::version::{InstallerIndex, VersionResolver};
use std::path::PathBuf;
use tracing::{debug, warn, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    match &cli.command {
        Command::Synth(cmd) => synth_pipeline(cmd, &cli)?,
        Command::Validate(cmd) => validate_config(cmd, &cli)?,
        Command::Render(cmd) => render_template(cmd)?,
        Command::Resolve(cmd) => resolve_version(cmd, &cli)?,
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<FarmConfig> {
    let path = cli.config_path();
    debug!(config = %path.display(), "Loading farm config");
    FarmConfig::from_file(&path).context("Failed to load farm config")
}

fn synth_pipeline(cmd: &SynthCommand, cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    for warning in config.validate()? {
        warn!("{}", warning);
        eprintln!("{}", format_warning(&warning));
    }

    let index = InstallerIndex::from_file(&config.installer_index)
        .context("Failed to load installer index")?;

    let out_dir = cmd.out.clone().unwrap_or_else(|| config.output_dir.clone());
    let mut stager = AssetStager::new(&out_dir, &config.asset_bucket);

    let request = config.to_request();
    let descriptors = ImageBuilderPipeline::new(&index, &mut stager)
        .with_template(config.component_template())
        .with_id_prefix(&config.id_prefix)
        .assemble(&request)
        .context("Failed to assemble image pipeline")?;

    let output = synth::write(&out_dir, &cmd.stack_name, &descriptors, stager.manifest())?;

    if cmd.json {
        let template = synth::synthesize(&descriptors)?;
        println!("{}", serde_json::to_string_pretty(&template)?);
        return Ok(());
    }

    println!("{} Assembled image pipeline", CHECK);
    println!("{}", format_descriptors(&descriptors));
    println!(
        "\n{} Template written to {}",
        INFO,
        style(output.template_path.display()).bold()
    );
    println!(
        "{} Asset manifest written to {}",
        INFO,
        style(output.manifest_path.display()).dim()
    );

    Ok(())
}

fn validate_config(cmd: &ValidateCommand, cli: &Cli) -> Result<()> {
    println!("{} Validating farm configuration...", INFO);

    let config = match load_config(cli) {
        Ok(config) => config,
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(format!("{:#}", e)).red());
            std::process::exit(1);
        }
    };

    match config.validate() {
        Ok(warnings) => {
            for warning in &warnings {
                println!("{}", format_warning(warning));
            }
            println!("{} Farm configuration is valid!", CHECK);
            println!("  OS: {}", style(config.os_type).bold());
            println!("  Parent image: {}", style(&config.parent_ami).cyan());
            println!("  Extra components: {}", style(config.component_arns.len()).cyan());

            if cmd.json {
                let json = serde_json::json!({
                    "config": config,
                    "warnings": warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
                });
                println!("\n{}", serde_json::to_string_pretty(&json)?);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(e).red());
            std::process::exit(1);
        }
    }
}

fn render_template(cmd: &RenderCommand) -> Result<()> {
    let tokens: TokenMap = cmd.token.iter().cloned().collect();
    let mode = if cmd.strict { RenderMode::Strict } else { RenderMode::Lenient };
    let out_dir = cmd.out.clone().unwrap_or_else(std::env::temp_dir);

    let rendered = template::render(&cmd.template, &tokens, &out_dir, mode)
        .with_context(|| format!("Failed to render {}", cmd.template.display()))?;

    println!("{} Rendered {}", CHECK, style(rendered.display()).bold());
    Ok(())
}

fn resolve_version(cmd: &ResolveCommand, cli: &Cli) -> Result<()> {
    let index_path: PathBuf = match &cmd.index {
        Some(path) => path.clone(),
        None => load_config(cli)?.installer_index,
    };
    let index = InstallerIndex::from_file(&index_path)
        .with_context(|| format!("Failed to load installer index {}", index_path.display()))?;

    if cmd.list {
        let versions = index.versions();
        if cmd.json {
            println!("{}", serde_json::to_string_pretty(&versions)?);
        } else {
            println!("{} Indexed Deadline versions:", INFO);
            for version in &versions {
                println!("  {}", style(version).bold());
            }
        }
        return Ok(());
    }

    let installers = index.resolve(cmd.deadline_version.as_deref())?;
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&installers)?);
    } else {
        println!("{}", format_installers(&installers));
    }

    Ok(())
}
