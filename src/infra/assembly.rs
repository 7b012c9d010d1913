use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Result;
use serde_json::Value;

use crate::{
    domain::asset::FileAsset,
    infra::{asset_staging, contracts::CloudAssembly, error::AppError},
};

/// Writes the assembly into a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsCloudAssembly {
    out_dir: PathBuf,
}

impl FsCloudAssembly {
    pub fn create(out_dir: &Path) -> Result<Self, AppError> {
        fs::create_dir_all(out_dir).map_err(|source| AppError::AssemblyWrite {
            path: out_dir.to_path_buf(),
            source,
        })?;

        Ok(Self {
            out_dir: out_dir.to_path_buf(),
        })
    }
}

impl CloudAssembly for FsCloudAssembly {
    fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    fn stage_asset(&mut self, asset: &FileAsset) -> Result<PathBuf> {
        Ok(asset_staging::stage(asset, &self.out_dir)?)
    }

    fn write_json(&mut self, file_name: &str, document: &Value) -> Result<PathBuf> {
        let path = self.out_dir.join(file_name);
        let mut encoded =
            serde_json::to_string_pretty(document).map_err(|source| AppError::Encode {
                what: file_name.to_owned(),
                source,
            })?;
        encoded.push('\n');

        fs::write(&path, encoded).map_err(|source| AppError::AssemblyWrite {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn creates_out_dir_and_writes_pretty_json() {
        let root = tempfile::tempdir().expect("temp dir should be created");
        let out_dir = root.path().join("nested").join("stack.out");

        let mut assembly = FsCloudAssembly::create(&out_dir).expect("assembly should be created");
        let path = assembly
            .write_json("manifest.json", &json!({ "version": "1" }))
            .expect("json should be written");

        let written = fs::read_to_string(&path).expect("file should exist");
        assert_eq!(path, out_dir.join("manifest.json"));
        assert!(written.ends_with('\n'));
        assert_eq!(
            serde_json::from_str::<Value>(&written).expect("json should parse"),
            json!({ "version": "1" })
        );
    }
}
