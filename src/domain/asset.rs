use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetPackaging {
    Zip,
}

impl AssetPackaging {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Zip => "zip",
        }
    }

    fn extension(self) -> &'static str {
        match self {
            Self::Zip => ".zip",
        }
    }
}

/// A local directory fingerprinted by content, published by the asset publisher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAsset {
    pub hash: String,
    pub source_dir: PathBuf,
    pub packaging: AssetPackaging,
}

impl FileAsset {
    pub fn directory(hash: impl Into<String>, source_dir: impl Into<PathBuf>) -> Self {
        Self {
            hash: hash.into(),
            source_dir: source_dir.into(),
            packaging: AssetPackaging::Zip,
        }
    }

    /// Directory name of the staged copy inside the output assembly.
    pub fn staged_name(&self) -> String {
        format!("asset.{}", self.hash)
    }

    pub fn object_key(&self) -> String {
        format!("{}{}", self.hash, self.packaging.extension())
    }
}
