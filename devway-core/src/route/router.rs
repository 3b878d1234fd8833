use crate::conf::{ConfigError, RuntimeConfig};
use crate::route::rule::ProxyRule;
use std::sync::Arc;

/// Ordered, immutable rule table. The first matching rule wins.
#[derive(Debug, Default)]
pub struct Router {
    rules: Vec<Arc<ProxyRule>>,
}

impl Router {
    pub fn new(rules: Vec<ProxyRule>) -> Self {
        Self {
            rules: rules.into_iter().map(Arc::new).collect(),
        }
    }

    /// Find the rule for a request path; `None` means the request falls through.
    pub fn match_rule(&self, request_path: &str) -> Option<&Arc<ProxyRule>> {
        self.rules.iter().find(|rule| rule.matches(request_path))
    }

    pub fn rules(&self) -> &[Arc<ProxyRule>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Build the router from the validated configuration.
pub fn build_router(cfg: &RuntimeConfig) -> Result<Router, ConfigError> {
    let target = Arc::new(cfg.upstream.clone());

    let rules = cfg
        .rules
        .iter()
        .map(|spec| ProxyRule::from_spec(spec, target.clone()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Router::new(rules))
}
