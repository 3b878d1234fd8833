mod defaults;
pub mod error;
mod loader;
pub mod types;
mod upstream;

pub use defaults::default_rules;
pub use error::ConfigError;
pub use loader::{
    DEFAULT_CONFIG_PATH, DEFAULT_LISTEN, DEFAULT_UPSTREAM, UPSTREAM_ENV, load_config,
    load_config_str,
};
pub use types::{ConfigSpec, RuleSpec, RuntimeConfig, ServerConfig, StaticFilesConfig};
pub use upstream::UpstreamTarget;
