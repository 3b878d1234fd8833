use crate::route::ProxyRule;
use http::{Method, Uri};
use pingora::prelude::Session;
use std::sync::Arc;
use std::time::Instant;

/// Per-request state carried through the gateway hooks.
#[derive(Debug)]
pub struct RequestCtx {
    /// HTTP method as received.
    pub method: Option<Method>,

    /// Original URI as received from the client.
    pub original_uri: Option<Uri>,

    /// Path used for rule matching.
    pub route_path: String,

    /// Peer address of the downstream connection, for logs.
    pub client_addr: Option<String>,

    /// Is it a websocket upgrade request (or not)?
    pub is_upgrade_req: bool,

    /// Was a websocket connection opened?
    pub ws_opened: bool,

    /// Rule selected in `request_filter`; `None` for fall-through requests.
    pub rule: Option<Arc<ProxyRule>>,

    /// Body chunks relayed for passthrough rules.
    pub relayed_chunks: u64,

    /// Body bytes relayed for passthrough rules.
    pub relayed_bytes: u64,

    pub started_at: Instant,
}

impl RequestCtx {
    pub fn empty() -> Self {
        Self {
            method: None,
            original_uri: None,
            route_path: String::new(),
            client_addr: None,
            is_upgrade_req: false,
            ws_opened: false,
            rule: None,
            relayed_chunks: 0,
            relayed_bytes: 0,
            started_at: Instant::now(),
        }
    }

    pub fn hydrate_from_session(&mut self, session: &Session) {
        let req = session.req_header();

        self.method = Some(req.method.clone());
        self.route_path = req.uri.path().to_string();
        self.original_uri = Some(req.uri.clone());
        self.client_addr = session.client_addr().map(|addr| addr.to_string());
        self.is_upgrade_req = session.is_upgrade_req();
    }

    /// Path and query forwarded upstream, exactly as the client sent them.
    pub fn path_and_query(&self) -> &str {
        self.original_uri
            .as_ref()
            .and_then(|uri| uri.path_and_query())
            .map(|pq| pq.as_str())
            .unwrap_or(&self.route_path)
    }

    pub fn method_str(&self) -> &str {
        self.method.as_ref().map(Method::as_str).unwrap_or("-")
    }

    pub fn rule_name(&self) -> &str {
        self.rule.as_ref().map(|r| r.name.as_str()).unwrap_or("-")
    }

    pub fn is_head(&self) -> bool {
        self.method.as_ref() == Some(&Method::HEAD)
    }
}
