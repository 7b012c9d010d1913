use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Result;
use serde_json::Value;

use crate::{
    domain::asset::FileAsset,
    infra::{
        config::AppConfig,
        contracts::{CloudAssembly, ConfigAdapter},
    },
};

#[derive(Debug, Clone, Default)]
pub struct StubConfigAdapter;

impl ConfigAdapter for StubConfigAdapter {
    fn load(&self) -> Result<AppConfig> {
        Ok(AppConfig::default())
    }
}

/// Keeps the assembly in memory; nothing touches the filesystem.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssembly {
    out_dir: PathBuf,
    pub documents: BTreeMap<String, Value>,
    pub staged: Vec<FileAsset>,
}

impl InMemoryAssembly {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            ..Self::default()
        }
    }
}

impl CloudAssembly for InMemoryAssembly {
    fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    fn stage_asset(&mut self, asset: &FileAsset) -> Result<PathBuf> {
        if !self.staged.contains(asset) {
            self.staged.push(asset.clone());
        }
        Ok(self.out_dir.join(asset.staged_name()))
    }

    fn write_json(&mut self, file_name: &str, document: &Value) -> Result<PathBuf> {
        self.documents.insert(file_name.to_owned(), document.clone());
        Ok(self.out_dir.join(file_name))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn stub_config_returns_defaults() {
        let adapter = StubConfigAdapter;
        let config = adapter.load().expect("stub config must load");

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn in_memory_assembly_records_documents() {
        let mut assembly = InMemoryAssembly::new("out");
        let path = assembly
            .write_json("manifest.json", &json!({ "version": "1" }))
            .expect("write should succeed");

        assert_eq!(path, PathBuf::from("out").join("manifest.json"));
        assert_eq!(assembly.documents["manifest.json"]["version"], "1");
    }
}
