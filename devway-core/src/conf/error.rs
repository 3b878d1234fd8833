use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    // IO / Discovery
    #[error("config file {} does not exist", path.display())]
    MissingFile { path: PathBuf },

    // Parsing / layering
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    // Server
    #[error("invalid listen address '{listen}': {reason}")]
    InvalidListen { listen: String, reason: String },

    #[error("server.threads must be greater than zero")]
    InvalidThreads,

    // Upstream
    #[error("invalid upstream '{upstream}': {reason}")]
    InvalidUpstream { upstream: String, reason: String },

    // Rules
    #[error("rule #{index} has an empty pattern")]
    EmptyPattern { index: usize },

    #[error("rule '{pattern}' has an invalid pattern: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("rule '{pattern}' cannot enable both websocket and stream_passthrough")]
    ConflictingRuleFlags { pattern: String },

    // Static files
    #[error("static files directory {} is not a directory", path.display())]
    InvalidStaticDir { path: PathBuf },
}

impl ConfigError {
    pub(crate) fn invalid_upstream(upstream: &str, reason: impl Into<String>) -> Self {
        Self::InvalidUpstream {
            upstream: upstream.to_string(),
            reason: reason.into(),
        }
    }
}
