use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::infra::{
    config::{file_config::FileConfig, AppConfig},
    error::AppError,
};

const DEFAULT_CONFIG_PATH: &str = "cfstack.toml";
const APP_DIR_NAME: &str = "cfstack";
const USER_CONFIG_FILE: &str = "config.toml";

pub const ENV_ACCOUNT: &str = "CFSTACK_ACCOUNT";
pub const ENV_REGION: &str = "CFSTACK_REGION";
pub const ENV_PREFIX: &str = "CFSTACK_PREFIX";

pub fn load(path: Option<&Path>) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::default();

    if let Some(config_path) = resolve_path(path) {
        tracing::debug!(path = %config_path.display(), "loading config file");
        read_file(&config_path)?.merge_into(&mut config);
    }

    apply_env_overrides(&mut config, |key| env::var(key).ok());
    Ok(config)
}

/// Explicit path first, then the working directory, then the user config dir.
fn resolve_path(path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = path {
        return path.exists().then(|| path.to_path_buf());
    }

    let local = PathBuf::from(DEFAULT_CONFIG_PATH);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|base| base.join(APP_DIR_NAME).join(USER_CONFIG_FILE))
        .filter(|candidate| candidate.exists())
}

fn read_file(config_path: &Path) -> Result<FileConfig, AppError> {
    let raw = fs::read_to_string(config_path).map_err(|source| AppError::ConfigRead {
        path: config_path.to_path_buf(),
        source,
    })?;

    toml::from_str(&raw).map_err(|source| AppError::ConfigParse {
        path: config_path.to_path_buf(),
        source,
    })
}

fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(account) = lookup(ENV_ACCOUNT) {
        config.stack.account = Some(account);
    }

    if let Some(region) = lookup(ENV_REGION) {
        config.stack.region = Some(region);
    }

    if let Some(prefix) = lookup(ENV_PREFIX) {
        config.stack.prefix = prefix;
    }
}
