use http::{HeaderMap, StatusCode};
use tokio::fs;

#[derive(Debug)]
pub enum StaticBody {
    Empty,
    /// Streamed from disk in fixed-size chunks.
    File { file: fs::File, len: u64 },
}

#[derive(Debug)]
pub struct StaticResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: StaticBody,
}
