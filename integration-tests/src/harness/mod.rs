pub mod server;
pub mod tracing;
pub mod upstream;

pub use server::{TestServer, free_port};
pub use tracing::{CapturedEvent, init_test_tracing};
pub use upstream::{ChunkedUpstream, EchoUpstream, SeenRequest, WsUpstream};
