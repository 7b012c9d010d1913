use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_json::Value;

use crate::{domain::asset::FileAsset, infra::config::AppConfig};

pub trait ConfigAdapter {
    fn load(&self) -> Result<AppConfig>;
}

/// Destination of a synthesized assembly.
pub trait CloudAssembly {
    fn out_dir(&self) -> &Path;
    fn stage_asset(&mut self, asset: &FileAsset) -> Result<PathBuf>;
    fn write_json(&mut self, file_name: &str, document: &Value) -> Result<PathBuf>;
}
