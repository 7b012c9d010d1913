use std::path::PathBuf;

use thiserror::Error;

use crate::domain::StackError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to initialize logging: {0}")]
    LoggingInit(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("asset directory {path} does not exist or is not a directory")]
    AssetMissing { path: PathBuf },
    #[error("asset directory {path} contains no files")]
    AssetEmpty { path: PathBuf },
    #[error("failed to read asset at {path}: {source}")]
    AssetRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("asset at {path} changed while staging (expected {expected}, staged {actual})")]
    AssetChanged {
        path: PathBuf,
        expected: String,
        actual: String,
    },
    #[error("failed to write assembly output at {path}: {source}")]
    AssemblyWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode {what} as JSON: {source}")]
    Encode {
        what: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid stack definition: {0}")]
    Stack(#[from] StackError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
