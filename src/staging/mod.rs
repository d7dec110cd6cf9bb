//! Asset staging for the provisioning engine
//!
//! Files are copied into `<output_dir>/asset.<sha256>/` and assigned the S3
//! location the provisioning engine will upload them to. Identical content
//! always lands in the same place.

use crate::error::{PipelineError, PipelineResult};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Key prefix for uploaded assets
pub const ASSET_KEY_PREFIX: &str = "assets";

/// Directory under the output dir used for intermediate renders
const SCRATCH_DIR: &str = ".scratch";

/// A file staged for upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedAsset {
    /// Hex sha256 of the file contents
    pub hash: String,
    pub file_name: String,
    pub local_path: PathBuf,
    pub bucket: String,
    pub object_key: String,
}

impl StagedAsset {
    pub fn s3_url(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.object_key)
    }
}

/// Stages files into an output directory
#[derive(Debug, Clone)]
pub struct AssetStager {
    output_dir: PathBuf,
    bucket: String,
    staged: Vec<StagedAsset>,
}

impl AssetStager {
    pub fn new(output_dir: impl Into<PathBuf>, bucket: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            bucket: bucket.into(),
            staged: Vec::new(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Working area for files that are rendered before staging
    pub fn scratch_dir(&self) -> PathBuf {
        self.output_dir.join(SCRATCH_DIR)
    }

    /// Copy `path` into the asset directory for its content hash
    pub fn stage(&mut self, path: &Path) -> PipelineResult<StagedAsset> {
        let staging_err = |source| PipelineError::Staging {
            path: path.to_path_buf(),
            source,
        };

        let content = std::fs::read(path).map_err(staging_err)?;
        let hash = hex::encode(Sha256::digest(&content));

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "asset".to_string());

        let asset_dir = self.output_dir.join(format!("asset.{}", hash));
        let local_path = asset_dir.join(&file_name);

        if !local_path.exists() {
            std::fs::create_dir_all(&asset_dir).map_err(staging_err)?;
            std::fs::write(&local_path, &content).map_err(staging_err)?;
        }

        let asset = StagedAsset {
            object_key: format!("{}/{}/{}", ASSET_KEY_PREFIX, hash, file_name),
            hash,
            file_name,
            local_path,
            bucket: self.bucket.clone(),
        };

        debug!(hash = %asset.hash, url = %asset.s3_url(), "Staged asset");

        if !self.staged.contains(&asset) {
            self.staged.push(asset.clone());
        }

        Ok(asset)
    }

    /// Everything staged so far, in staging order
    pub fn manifest(&self) -> &[StagedAsset] {
        &self.staged
    }
}
