use crate::proxy::{TransportFailure, classify_pingora_error};
use pingora::prelude::*;

#[test]
fn upstream_connect_errors_are_connect_failures() {
    for etype in [ConnectRefused, ConnectTimedout, ConnectNoRoute] {
        let err = Error::new_up(etype);
        assert_eq!(classify_pingora_error(&err), TransportFailure::Connect);
    }
}

#[test]
fn upstream_io_errors_are_classified() {
    assert_eq!(
        classify_pingora_error(&Error::new_up(ReadTimedout)),
        TransportFailure::Timeout
    );
    assert_eq!(
        classify_pingora_error(&Error::new_up(ConnectionClosed)),
        TransportFailure::Reset
    );
    assert_eq!(
        classify_pingora_error(&Error::new_up(TLSHandshakeFailure)),
        TransportFailure::Tls
    );
    assert_eq!(
        classify_pingora_error(&Error::new_up(H1Error)),
        TransportFailure::Protocol
    );
}

#[test]
fn downstream_errors_are_not_blamed_on_upstream() {
    let err = Error::new_down(ConnectionClosed);
    assert_eq!(classify_pingora_error(&err), TransportFailure::Downstream);
}

#[test]
fn internal_errors_are_unknown() {
    let err = Error::new(Custom("no rule selected"));
    assert_eq!(classify_pingora_error(&err), TransportFailure::Unknown);
    assert_eq!(TransportFailure::Unknown.to_string(), "unknown");
}
