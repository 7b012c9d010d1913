use std::path::PathBuf;

use serde::Deserialize;

use crate::{
    domain::distribution::{PriceClass, ViewerProtocolPolicy},
    infra::config::{
        AppConfig, AssetConfig, HandlerConfig, LogConfig, SiteConfig, StackConfig, SynthConfig,
    },
};

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub stack: Option<FileStackConfig>,
    pub site: Option<FileSiteConfig>,
    pub handlers: Option<FileHandlerConfig>,
    pub assets: Option<FileAssetConfig>,
    pub synth: Option<FileSynthConfig>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut AppConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(stack) = self.stack {
            stack.merge_into(&mut config.stack);
        }

        if let Some(site) = self.site {
            site.merge_into(&mut config.site);
        }

        if let Some(handlers) = self.handlers {
            handlers.merge_into(&mut config.handlers);
        }

        if let Some(assets) = self.assets {
            assets.merge_into(&mut config.assets);
        }

        if let Some(synth) = self.synth {
            synth.merge_into(&mut config.synth);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileLogConfig {
    pub level: Option<String>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileStackConfig {
    pub name: Option<String>,
    pub prefix: Option<String>,
    pub account: Option<String>,
    pub region: Option<String>,
}

impl FileStackConfig {
    fn merge_into(self, config: &mut StackConfig) {
        if let Some(name) = self.name {
            config.name = name;
        }

        if let Some(prefix) = self.prefix {
            config.prefix = prefix;
        }

        if self.account.is_some() {
            config.account = self.account;
        }

        if self.region.is_some() {
            config.region = self.region;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileSiteConfig {
    pub asset_dir: Option<PathBuf>,
    pub default_root_object: Option<String>,
    pub price_class: Option<PriceClass>,
    pub viewer_protocol_policy: Option<ViewerProtocolPolicy>,
    pub log_includes_cookies: Option<bool>,
}

impl FileSiteConfig {
    fn merge_into(self, config: &mut SiteConfig) {
        if let Some(asset_dir) = self.asset_dir {
            config.asset_dir = asset_dir;
        }

        if let Some(root) = self.default_root_object {
            config.default_root_object = root;
        }

        if let Some(price_class) = self.price_class {
            config.price_class = price_class;
        }

        if let Some(policy) = self.viewer_protocol_policy {
            config.viewer_protocol_policy = policy;
        }

        if let Some(include) = self.log_includes_cookies {
            config.log_includes_cookies = include;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileHandlerConfig {
    pub auto_delete_objects: Option<String>,
    pub bucket_deployment: Option<String>,
}

impl FileHandlerConfig {
    fn merge_into(self, config: &mut HandlerConfig) {
        if self.auto_delete_objects.is_some() {
            config.auto_delete_objects = self.auto_delete_objects;
        }

        if self.bucket_deployment.is_some() {
            config.bucket_deployment = self.bucket_deployment;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileAssetConfig {
    pub bucket: Option<String>,
}

impl FileAssetConfig {
    fn merge_into(self, config: &mut AssetConfig) {
        if self.bucket.is_some() {
            config.bucket = self.bucket;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileSynthConfig {
    pub out_dir: Option<PathBuf>,
}

impl FileSynthConfig {
    fn merge_into(self, config: &mut SynthConfig) {
        if let Some(out_dir) = self.out_dir {
            config.out_dir = out_dir;
        }
    }
}
