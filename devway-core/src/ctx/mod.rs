mod request_ctx;
#[cfg(test)]
mod tests;

pub use request_ctx::RequestCtx;
