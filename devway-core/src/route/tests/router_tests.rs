use crate::conf::{RuleSpec, UpstreamTarget, load_config_str};
use crate::route::{ProxyRule, Router, build_router};
use std::sync::Arc;

fn rule(pattern: &str, websocket: bool) -> ProxyRule {
    let target = Arc::new(UpstreamTarget::parse("http://127.0.0.1:9000/").unwrap());
    let spec = RuleSpec {
        pattern: pattern.to_string(),
        websocket,
        change_origin: websocket,
        ..Default::default()
    };
    ProxyRule::from_spec(&spec, target).unwrap()
}

#[test]
fn matches_prefix_with_path_preserved() {
    // Arrange
    let router = Router::new(vec![rule("^/ping", false), rule("^/status", false)]);

    // Act
    let matched = router.match_rule("/ping/status");

    // Assert
    assert_eq!(matched.map(|r| r.name.as_str()), Some("^/ping"));
}

#[test]
fn unknown_path_falls_through() {
    // Arrange
    let router = Router::new(vec![rule("^/ping", false), rule("^/status", false)]);

    // Act / Assert
    assert!(router.match_rule("/unknown/path").is_none());
    assert!(router.match_rule("/").is_none());
}

#[test]
fn prefix_is_anchored_to_path_start() {
    // Arrange
    let router = Router::new(vec![rule("^/docker", false)]);

    // Act / Assert
    assert!(router.match_rule("/assets/docker.svg").is_none());
    assert!(router.match_rule("/docker/v1.0/containers").is_some());
}

#[test]
fn first_match_wins_in_table_order() {
    // Arrange
    let router = Router::new(vec![rule("^/mavlink", true), rule("^/mavlink2rest", false)]);

    // Act
    let matched = router.match_rule("/mavlink2rest/ws/mavlink").unwrap();

    // Assert
    assert_eq!(matched.name, "^/mavlink");
    assert!(matched.websocket);
}

#[test]
fn rules_share_one_target() {
    // Arrange
    let cfg = load_config_str("", Some("http://127.0.0.1:9000/".to_string())).unwrap();

    // Act
    let router = build_router(&cfg).unwrap();

    // Assert
    assert_eq!(router.len(), cfg.rules.len());
    let first = &router.rules()[0].target;
    assert!(router.rules().iter().all(|r| Arc::ptr_eq(&r.target, first)));
    assert_eq!(first.authority(), "127.0.0.1:9000");
}

#[test]
fn default_table_routes_backend_paths() {
    // Arrange
    let cfg = load_config_str("", None).unwrap();
    let router = build_router(&cfg).unwrap();

    // Act
    let mavlink = router.match_rule("/mavlink2rest/ws/mavlink").unwrap();
    let kraken = router.match_rule("/kraken/v1.0/extensions").unwrap();
    let helper = router.match_rule("/helper/v1.0/web_services").unwrap();

    // Assert
    assert!(mavlink.websocket && mavlink.change_origin);
    assert!(kraken.stream_passthrough);
    assert!(!helper.websocket && !helper.change_origin && !helper.stream_passthrough);
    assert!(router.match_rule("/index.html").is_none());
    assert!(router.match_rule("/assets/index-1a2b3c.js").is_none());
}

#[test]
fn empty_router_matches_nothing() {
    // Arrange
    let router = Router::default();

    // Act / Assert
    assert!(router.is_empty());
    assert!(router.match_rule("/ping").is_none());
    assert!(!Router::new(vec![rule("^/ping", false)]).is_empty());
}
