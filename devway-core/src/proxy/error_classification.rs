use std::fmt;

/// Coarse reason an upstream exchange failed, for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    Connect,
    Tls,
    Protocol,
    Timeout,
    Reset,
    Downstream,
    Unknown,
}

impl TransportFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Tls => "tls",
            Self::Protocol => "protocol",
            Self::Timeout => "timeout",
            Self::Reset => "reset",
            Self::Downstream => "downstream",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn classify_pingora_error(err: &pingora::Error) -> TransportFailure {
    use pingora::{ErrorSource, ErrorType::*};

    match err.esource() {
        ErrorSource::Upstream => {}
        // Client went away or sent garbage; the upstream is not at fault.
        ErrorSource::Downstream => return TransportFailure::Downstream,
        _ => return TransportFailure::Unknown,
    }

    match err.etype() {
        // Connect phase.
        ConnectTimedout | ConnectRefused | ConnectNoRoute | ConnectProxyFailure | ConnectError => {
            TransportFailure::Connect
        }

        // TLS / handshake.
        TLSHandshakeFailure | TLSHandshakeTimedout | TLSWantX509Lookup | InvalidCert
        | HandshakeError => TransportFailure::Tls,

        // Protocol.
        InvalidHTTPHeader | H1Error | H2Error | InvalidH2 | H2Downgrade => {
            TransportFailure::Protocol
        }

        // Established connection IO.
        ReadTimedout | WriteTimedout => TransportFailure::Timeout,

        ReadError | WriteError | ConnectionClosed => TransportFailure::Reset,

        _ => TransportFailure::Unknown,
    }
}
