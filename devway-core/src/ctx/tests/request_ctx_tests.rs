use crate::conf::{RuleSpec, UpstreamTarget};
use crate::ctx::RequestCtx;
use crate::route::ProxyRule;
use http::{Method, Uri};
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[test]
fn empty_ctx_has_placeholders_for_logs() {
    // Act
    let ctx = RequestCtx::empty();

    // Assert
    assert_eq!(ctx.method_str(), "-");
    assert_eq!(ctx.rule_name(), "-");
    assert!(!ctx.is_upgrade_req);
    assert!(!ctx.ws_opened);
    assert_eq!(ctx.relayed_bytes, 0);
}

#[test]
fn path_and_query_comes_from_original_uri() {
    // Arrange
    let mut ctx = RequestCtx::empty();
    ctx.route_path = "/kraken/v1.0/extension".to_string();
    ctx.original_uri = Some("/kraken/v1.0/extension?id=3".parse::<Uri>().unwrap());

    // Act / Assert
    assert_eq!(ctx.path_and_query(), "/kraken/v1.0/extension?id=3");
}

#[test]
fn path_and_query_falls_back_to_route_path() {
    // Arrange
    let mut ctx = RequestCtx::empty();
    ctx.route_path = "/status".to_string();

    // Act / Assert
    assert_eq!(ctx.path_and_query(), "/status");
}

#[test]
fn matched_rule_and_method_are_reported() {
    // Arrange
    let target = Arc::new(UpstreamTarget::parse("http://127.0.0.1:9000/").unwrap());
    let spec = RuleSpec {
        name: Some("kraken".to_string()),
        pattern: "^/kraken".to_string(),
        stream_passthrough: true,
        ..Default::default()
    };
    let mut ctx = RequestCtx::empty();
    ctx.method = Some(Method::HEAD);
    ctx.rule = Some(Arc::new(ProxyRule::from_spec(&spec, target).unwrap()));

    // Act / Assert
    assert_eq!(ctx.method_str(), "HEAD");
    assert_eq!(ctx.rule_name(), "kraken");
    assert!(ctx.is_head());
}
