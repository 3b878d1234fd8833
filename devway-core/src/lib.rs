pub mod cli;
pub mod conf;
pub mod ctx;
pub mod logging;
pub mod proxy;
pub mod route;
pub mod server;
pub mod static_files;
