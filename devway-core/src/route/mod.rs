pub mod router;
pub mod rule;
#[cfg(test)]
mod tests;

pub use router::{Router, build_router};
pub use rule::ProxyRule;
