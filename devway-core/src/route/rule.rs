use crate::conf::{ConfigError, RuleSpec, UpstreamTarget};
use regex::Regex;
use std::sync::Arc;

/// A compiled path rule forwarding to the shared upstream.
#[derive(Debug, Clone)]
pub struct ProxyRule {
    pub name: String,
    pub pattern: Regex,
    pub target: Arc<UpstreamTarget>,

    /// Rewrite `Host` to the upstream authority.
    pub change_origin: bool,

    /// Forward WebSocket upgrades for this rule.
    pub websocket: bool,

    /// Relay the body chunk by chunk and end the client response with the upstream.
    pub stream_passthrough: bool,
}

impl ProxyRule {
    pub fn from_spec(spec: &RuleSpec, target: Arc<UpstreamTarget>) -> Result<Self, ConfigError> {
        let pattern = Regex::new(&spec.pattern).map_err(|source| ConfigError::InvalidPattern {
            pattern: spec.pattern.clone(),
            source,
        })?;

        Ok(Self {
            name: spec.display_name().to_string(),
            pattern,
            target,
            change_origin: spec.change_origin,
            websocket: spec.websocket,
            stream_passthrough: spec.stream_passthrough,
        })
    }

    pub fn matches(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }
}
