mod adapter;
mod app_config;
mod file_config;
mod loader;

pub use adapter::FileConfigAdapter;
pub use app_config::{
    AppConfig, AssetConfig, HandlerConfig, LogConfig, SiteConfig, StackConfig, SynthConfig,
};
pub use loader::load;
