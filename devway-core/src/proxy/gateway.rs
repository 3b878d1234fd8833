use crate::conf::{StaticFilesConfig, UpstreamTarget};
use crate::ctx::RequestCtx;
use crate::proxy::classify_pingora_error;
use crate::proxy::forward::prepare_upstream_request;
use crate::route::Router;
use crate::static_files::respond_with_static;
use async_trait::async_trait;
use bytes::Bytes;
use http::StatusCode;
use pingora::prelude::*;
use pingora_http::{RequestHeader, ResponseHeader};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Forwards requests matching the rule table to the upstream and serves
/// everything else locally.
pub struct DevGateway {
    router: Arc<Router>,
    static_files: Option<StaticFilesConfig>,
}

impl DevGateway {
    pub fn new(router: Arc<Router>, static_files: Option<StaticFilesConfig>) -> Self {
        Self {
            router,
            static_files,
        }
    }
}

/// Hook order for one request:
///
/// 1. new_ctx()                  allocate an empty RequestCtx
/// 2. request_filter()           hydrate ctx, match a rule or serve locally
/// 3. upstream_peer()            resolve the target and build the HttpPeer
/// 4. upstream_request_filter()  rewrite URI, Host and upgrade headers
/// 5. upstream_response_filter() detect a completed WebSocket upgrade
/// 6. response_body_filter()     relay body chunks (observed for passthrough rules)
/// 7. logging()                  access log, upstream failure classification
#[async_trait]
impl ProxyHttp for DevGateway {
    type CTX = RequestCtx;

    fn new_ctx(&self) -> Self::CTX {
        RequestCtx::empty()
    }

    /// ACCEPT → MATCH → (PROXY | SERVE LOCALLY)
    async fn request_filter(&self, session: &mut Session, ctx: &mut Self::CTX) -> Result<bool> {
        ctx.hydrate_from_session(session);

        let Some(rule) = self.router.match_rule(&ctx.route_path) else {
            tracing::debug!(path = %ctx.route_path, "no rule matched, serving locally");
            return respond_with_static(session, ctx, self.static_files.as_ref()).await;
        };

        if ctx.is_upgrade_req && !rule.websocket {
            tracing::debug!(
                path = %ctx.route_path,
                rule = %rule.name,
                "upgrade requested on a rule without websocket support, forwarding as plain HTTP"
            );
        }

        ctx.rule = Some(rule.clone());
        Ok(false)
    }

    async fn upstream_peer(
        &self,
        _session: &mut Session,
        ctx: &mut Self::CTX,
    ) -> Result<Box<HttpPeer>> {
        let rule = ctx
            .rule
            .as_ref()
            .ok_or_else(|| Error::new(Custom("no rule selected")))?;

        let addr = resolve_upstream(&rule.target).await?;
        let mut peer = HttpPeer::new(addr, rule.target.use_tls, rule.target.sni.clone());

        if ctx.is_upgrade_req && rule.websocket {
            // WebSockets MUST be HTTP/1.1
            peer.options.set_http_version(1, 1);
        }

        Ok(Box::new(peer))
    }

    async fn upstream_request_filter(
        &self,
        _session: &mut Session,
        upstream: &mut RequestHeader,
        ctx: &mut Self::CTX,
    ) -> Result<()> {
        let rule = ctx
            .rule
            .as_ref()
            .ok_or_else(|| Error::new(Custom("no rule selected")))?;

        prepare_upstream_request(upstream, rule, ctx.path_and_query(), ctx.is_upgrade_req)
    }

    fn upstream_response_filter(
        &self,
        _session: &mut Session,
        upstream: &mut ResponseHeader,
        ctx: &mut Self::CTX,
    ) -> Result<()> {
        if ctx.is_upgrade_req && upstream.status == StatusCode::SWITCHING_PROTOCOLS {
            // From here on the connection carries frames, not an HTTP response.
            ctx.ws_opened = true;
            tracing::info!(
                path = %ctx.route_path,
                rule = ctx.rule_name(),
                "websocket opened"
            );
        }

        Ok(())
    }

    fn response_body_filter(
        &self,
        _session: &mut Session,
        body: &mut Option<Bytes>,
        end_of_stream: bool,
        ctx: &mut Self::CTX,
    ) -> Result<Option<Duration>>
    where
        Self::CTX: Send + Sync,
    {
        let passthrough = ctx.rule.as_ref().is_some_and(|r| r.stream_passthrough);
        if !passthrough {
            return Ok(None);
        }

        // Each chunk goes to the client as it arrives, unmodified.
        if let Some(chunk) = body.as_ref() {
            ctx.relayed_chunks += 1;
            ctx.relayed_bytes += chunk.len() as u64;
            tracing::trace!(
                rule = ctx.rule_name(),
                len = chunk.len(),
                "relaying upstream chunk"
            );
        }

        if end_of_stream {
            tracing::debug!(
                rule = ctx.rule_name(),
                chunks = ctx.relayed_chunks,
                bytes = ctx.relayed_bytes,
                "upstream response ended, ending client response"
            );
        }

        Ok(None)
    }

    async fn logging(&self, session: &mut Session, e: Option<&Error>, ctx: &mut Self::CTX)
    where
        Self::CTX: Send + Sync,
    {
        let status = session
            .response_written()
            .map(|resp| resp.status.as_u16())
            .unwrap_or_default();
        let elapsed_ms = u64::try_from(ctx.started_at.elapsed().as_millis()).unwrap_or(u64::MAX);

        if ctx.ws_opened {
            tracing::info!(
                path = %ctx.route_path,
                rule = ctx.rule_name(),
                elapsed_ms,
                "websocket closed"
            );
        }

        match e {
            Some(err) => tracing::warn!(
                method = ctx.method_str(),
                path = %ctx.route_path,
                rule = ctx.rule_name(),
                client = ctx.client_addr.as_deref().unwrap_or("-"),
                status,
                elapsed_ms,
                failure = %classify_pingora_error(err),
                error = %err,
                "request failed"
            ),
            None => tracing::info!(
                method = ctx.method_str(),
                path = %ctx.route_path,
                rule = ctx.rule_name(),
                client = ctx.client_addr.as_deref().unwrap_or("-"),
                status,
                elapsed_ms,
                "request"
            ),
        }
    }
}

/// Resolve the upstream host without blocking the worker.
///
/// Resolution failures are reported as upstream connect errors, so the
/// client receives a gateway error instead of a dropped connection.
async fn resolve_upstream(target: &UpstreamTarget) -> Result<SocketAddr> {
    let mut addrs = tokio::net::lookup_host((target.host.as_str(), target.port))
        .await
        .map_err(|e| {
            Error::because(
                ConnectNoRoute,
                format!("failed to resolve upstream {}", target.host),
                e,
            )
            .into_up()
        })?;

    addrs.next().ok_or_else(|| {
        Error::explain(
            ConnectNoRoute,
            format!("upstream {} resolved to no addresses", target.host),
        )
        .into_up()
    })
}
