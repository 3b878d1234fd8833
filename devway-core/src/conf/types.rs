use crate::conf::defaults::default_rules;
use crate::conf::error::ConfigError;
use crate::conf::upstream::UpstreamTarget;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Configuration as written by the operator, after layering defaults,
/// the optional config file and the environment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConfigSpec {
    /// Base URL of the backend every rule forwards to.
    pub upstream: String,

    pub server: ServerConfig,

    #[serde(default)]
    pub static_files: Option<StaticFilesConfig>,

    /// Proxy rules in match order. Empty means "use the built-in table".
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleSpec>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// e.g. "127.0.0.1:8080"
    pub listen: String,

    /// Worker threads for the proxy service (Pingora default when unset).
    #[serde(default)]
    pub threads: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StaticFilesConfig {
    /// Directory holding the built frontend.
    pub dir: PathBuf,

    /// Answer extensionless unknown paths with the root `index.html`.
    #[serde(default = "default_spa_fallback")]
    pub spa_fallback: bool,
}

fn default_spa_fallback() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RuleSpec {
    /// Label used in logs; the pattern is used when absent.
    #[serde(default)]
    pub name: Option<String>,

    /// Regular expression tested against the request path.
    pub pattern: String,

    /// Rewrite `Host` to the upstream authority.
    #[serde(default)]
    pub change_origin: bool,

    /// Forward WebSocket upgrades.
    #[serde(default)]
    pub websocket: bool,

    /// Relay the upstream body chunk by chunk and end with it.
    #[serde(default)]
    pub stream_passthrough: bool,
}

impl RuleSpec {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.pattern)
    }
}

/// Validated configuration used to build the server.
#[derive(Debug, Clone, Serialize)]
pub struct RuntimeConfig {
    pub server: ServerConfig,
    pub listen_addr: SocketAddr,
    pub upstream: UpstreamTarget,
    pub static_files: Option<StaticFilesConfig>,
    pub rules: Vec<RuleSpec>,
    /// True when the rule table came from the built-in defaults.
    pub default_rules: bool,
}

impl RuntimeConfig {
    pub fn websocket_rules(&self) -> usize {
        self.rules.iter().filter(|r| r.websocket).count()
    }

    pub fn passthrough_rules(&self) -> usize {
        self.rules.iter().filter(|r| r.stream_passthrough).count()
    }
}

impl ConfigSpec {
    /// Validate the spec and turn it into a [`RuntimeConfig`].
    pub fn lower(self) -> Result<RuntimeConfig, ConfigError> {
        let listen_addr =
            self.server
                .listen
                .parse::<SocketAddr>()
                .map_err(|e| ConfigError::InvalidListen {
                    listen: self.server.listen.clone(),
                    reason: e.to_string(),
                })?;

        if self.server.threads == Some(0) {
            return Err(ConfigError::InvalidThreads);
        }

        let upstream = UpstreamTarget::parse(&self.upstream)?;

        if let Some(static_files) = &self.static_files {
            if !static_files.dir.is_dir() {
                return Err(ConfigError::InvalidStaticDir {
                    path: static_files.dir.clone(),
                });
            }
        }

        let default_rules_used = self.rules.is_empty();
        let rules = if default_rules_used {
            default_rules()
        } else {
            self.rules
        };

        for (index, rule) in rules.iter().enumerate() {
            validate_rule(index, rule)?;
        }

        Ok(RuntimeConfig {
            server: self.server,
            listen_addr,
            upstream,
            static_files: self.static_files,
            rules,
            default_rules: default_rules_used,
        })
    }
}

fn validate_rule(index: usize, rule: &RuleSpec) -> Result<(), ConfigError> {
    if rule.pattern.trim().is_empty() {
        return Err(ConfigError::EmptyPattern { index });
    }

    Regex::new(&rule.pattern).map_err(|source| ConfigError::InvalidPattern {
        pattern: rule.pattern.clone(),
        source,
    })?;

    if rule.websocket && rule.stream_passthrough {
        return Err(ConfigError::ConflictingRuleFlags {
            pattern: rule.pattern.clone(),
        });
    }

    Ok(())
}
