//! render-farm-image - EC2 Image Builder pipeline synthesis for Deadline render farm workers

pub mod assembler;
pub mod cli;
pub mod core;
pub mod error;
pub mod staging;
pub mod synth;
pub mod template;
pub mod version;

// Re-export commonly used types
pub use assembler::{ImageBuilderPipeline, PipelineDescriptors};
pub use core::{OsType, Platform, PipelineRequest, Schedule, StartCondition, DEFAULT_SCHEDULE};
pub use error::{PipelineError, PipelineResult};
pub use staging::{AssetStager, StagedAsset};
pub use template::{render, render_str, RenderMode, TokenMap};
pub use version::{InstallerIndex, InstallerLocation, VersionResolver};
