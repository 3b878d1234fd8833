use crate::conf::error::ConfigError;
use crate::conf::types::{ConfigSpec, RuntimeConfig};
use config::{Config, File, FileFormat, Source};
use std::path::Path;

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "devway.toml";

/// Environment variable overriding the upstream base address.
pub const UPSTREAM_ENV: &str = "DEVWAY_UPSTREAM";

pub const DEFAULT_UPSTREAM: &str = "http://localhost/";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8080";

/// Load the configuration.
///
/// Precedence (lowest to highest): built-in defaults, the TOML file,
/// `DEVWAY_UPSTREAM`. An explicit `path` must exist; the default path
/// is optional.
pub fn load_config(path: Option<&Path>) -> Result<RuntimeConfig, ConfigError> {
    let file = match path {
        Some(path) => {
            if !path.is_file() {
                return Err(ConfigError::MissingFile {
                    path: path.to_path_buf(),
                });
            }
            Some(File::from(path).format(FileFormat::Toml).required(true))
        }
        None => {
            let path = Path::new(DEFAULT_CONFIG_PATH);
            path.is_file()
                .then(|| File::from(path).format(FileFormat::Toml).required(true))
        }
    };

    resolve(file, upstream_from_env())
}

/// Load the configuration from TOML text instead of a file.
pub fn load_config_str(
    toml: &str,
    env_upstream: Option<String>,
) -> Result<RuntimeConfig, ConfigError> {
    resolve(Some(File::from_str(toml, FileFormat::Toml)), env_upstream)
}

fn upstream_from_env() -> Option<String> {
    std::env::var(UPSTREAM_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn resolve<S>(file: Option<S>, env_upstream: Option<String>) -> Result<RuntimeConfig, ConfigError>
where
    S: Source + Send + Sync + 'static,
{
    let mut builder = Config::builder()
        .set_default("upstream", DEFAULT_UPSTREAM)?
        .set_default("server.listen", DEFAULT_LISTEN)?;

    if let Some(file) = file {
        builder = builder.add_source(file);
    }

    if let Some(upstream) = &env_upstream {
        tracing::debug!(upstream, "upstream overridden from {UPSTREAM_ENV}");
    }

    let settings = builder
        .set_override_option("upstream", env_upstream)?
        .build()?;

    let spec: ConfigSpec = settings.try_deserialize()?;
    spec.lower()
}
