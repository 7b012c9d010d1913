use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::distribution::{PriceClass, ViewerProtocolPolicy};

pub const DEFAULT_PREFIX: &str = "sample-cloudfront-s3";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub logging: LogConfig,
    pub stack: StackConfig,
    pub site: SiteConfig,
    pub handlers: HandlerConfig,
    pub assets: AssetConfig,
    pub synth: SynthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StackConfig {
    pub name: String,
    pub prefix: String,
    pub account: Option<String>,
    pub region: Option<String>,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            name: "SampleCloudfrontS3Stack".to_owned(),
            prefix: DEFAULT_PREFIX.to_owned(),
            account: None,
            region: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteConfig {
    pub asset_dir: PathBuf,
    pub default_root_object: String,
    pub price_class: PriceClass,
    pub viewer_protocol_policy: ViewerProtocolPolicy,
    pub log_includes_cookies: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("../web"),
            default_root_object: "index.html".to_owned(),
            price_class: PriceClass::PriceClass200,
            viewer_protocol_policy: ViewerProtocolPolicy::AllowAll,
            log_includes_cookies: true,
        }
    }
}

/// Names of the externally deployed custom resource handlers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct HandlerConfig {
    pub auto_delete_objects: Option<String>,
    pub bucket_deployment: Option<String>,
}

impl HandlerConfig {
    pub fn auto_delete_objects_or_default(&self, prefix: &str) -> String {
        self.auto_delete_objects
            .clone()
            .unwrap_or_else(|| format!("{prefix}-auto-delete-objects"))
    }

    pub fn bucket_deployment_or_default(&self, prefix: &str) -> String {
        self.bucket_deployment
            .clone()
            .unwrap_or_else(|| format!("{prefix}-bucket-deployment"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AssetConfig {
    /// May contain `${AWS::AccountId}` / `${AWS::Region}` placeholders.
    pub bucket: Option<String>,
}

impl AssetConfig {
    pub fn bucket_or_default(&self, prefix: &str) -> String {
        self.bucket
            .clone()
            .unwrap_or_else(|| format!("{prefix}-assets-${{AWS::AccountId}}-${{AWS::Region}}"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SynthConfig {
    pub out_dir: PathBuf,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("stack.out"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_and_asset_names_derive_from_prefix() {
        let handlers = HandlerConfig::default();
        let assets = AssetConfig::default();

        assert_eq!(
            handlers.auto_delete_objects_or_default("site"),
            "site-auto-delete-objects"
        );
        assert_eq!(
            handlers.bucket_deployment_or_default("site"),
            "site-bucket-deployment"
        );
        assert_eq!(
            assets.bucket_or_default("site"),
            "site-assets-${AWS::AccountId}-${AWS::Region}"
        );
    }

    #[test]
    fn explicit_names_win_over_prefix() {
        let handlers = HandlerConfig {
            auto_delete_objects: Some("shared-purge".into()),
            bucket_deployment: Some("shared-deploy".into()),
        };

        assert_eq!(handlers.auto_delete_objects_or_default("site"), "shared-purge");
        assert_eq!(handlers.bucket_deployment_or_default("site"), "shared-deploy");
    }
}
