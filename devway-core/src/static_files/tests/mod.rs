mod handler_tests;
mod resolve_tests;
