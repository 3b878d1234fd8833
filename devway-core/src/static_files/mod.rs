mod handler;
mod resolve;
mod response;
#[cfg(test)]
mod tests;

pub use handler::{handle_static_request, respond_with_static};
pub use resolve::{ResolveError, resolve_static_path};
pub use response::{StaticBody, StaticResponse};
