mod error_classification;
mod forward;
mod gateway;
#[cfg(test)]
mod tests;

pub use error_classification::{TransportFailure, classify_pingora_error};
pub use gateway::DevGateway;
