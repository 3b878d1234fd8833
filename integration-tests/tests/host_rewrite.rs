use integration_tests::harness::{EchoUpstream, TestServer};
use pretty_assertions::assert_eq;

#[test]
fn change_origin_rule_rewrites_host() {
    // Arrange
    let upstream = EchoUpstream::start();
    let srv = TestServer::start(&upstream.url());

    // Act
    srv.get("/mavlink2rest/mavlink/vehicles")
        .send()
        .expect("request failed");

    // Assert
    let seen = upstream
        .last_request("/mavlink2rest/")
        .expect("request did not reach upstream");
    assert_eq!(seen.header("host"), Some(upstream.authority().as_str()));
}

#[test]
fn plain_rule_keeps_client_host() {
    // Arrange
    let upstream = EchoUpstream::start();
    let srv = TestServer::start(&upstream.url());

    // Act
    srv.get("/beacon/v1.0/services")
        .send()
        .expect("request failed");

    // Assert
    let seen = upstream
        .last_request("/beacon/")
        .expect("request did not reach upstream");
    let client_host = format!("127.0.0.1:{}", srv.port());
    assert_eq!(seen.header("host"), Some(client_host.as_str()));
}

#[test]
fn camera_manager_is_not_shadowed_by_mavlink() {
    // Arrange
    let upstream = EchoUpstream::start();
    let srv = TestServer::start(&upstream.url());

    // Act
    srv.get("/mavlink-camera-manager/sdp")
        .send()
        .expect("request failed");

    // Assert
    let seen = upstream
        .last_request("/mavlink-camera-manager/")
        .expect("request did not reach upstream");
    let client_host = format!("127.0.0.1:{}", srv.port());
    assert_eq!(seen.header("host"), Some(client_host.as_str()));
}
