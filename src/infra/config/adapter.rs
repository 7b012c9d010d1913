use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::infra::{
    config::{load, AppConfig},
    contracts::ConfigAdapter,
};

/// Reads `cfstack.toml` (or the explicit `--config` file) and the
/// `CFSTACK_*` environment overrides.
#[derive(Debug, Clone, Default)]
pub struct FileConfigAdapter {
    path: Option<PathBuf>,
}

impl FileConfigAdapter {
    pub fn new(path: Option<&Path>) -> Self {
        Self {
            path: path.map(Path::to_path_buf),
        }
    }
}

impl ConfigAdapter for FileConfigAdapter {
    fn load(&self) -> Result<AppConfig> {
        let config = load(self.path.as_deref()).with_context(|| match &self.path {
            Some(path) => format!("loading stack config from {}", path.display()),
            None => "loading stack config".to_owned(),
        })?;

        tracing::debug!(
            stack = %config.stack.name,
            prefix = %config.stack.prefix,
            asset_dir = %config.site.asset_dir.display(),
            "stack config resolved"
        );

        Ok(config)
    }
}
