use crate::conf::RuntimeConfig;
use crate::proxy::DevGateway;
use crate::route::build_router;
use anyhow::{Result, anyhow};
use pingora::prelude::*;
use pingora::server::Server;
use pingora::server::configuration::ServerConf;
use std::sync::Arc;

/// Run the Pingora server with the given configuration.
pub fn run(config: RuntimeConfig) -> Result<()> {
    let server = build_pingora_server(config)?;

    // Blocks the main thread; Pingora owns its runtimes.
    server.run_forever();
}

/// Build the Pingora server with the gateway listening on `config.listen_addr`.
pub fn build_pingora_server(config: RuntimeConfig) -> Result<Server> {
    let mut server = if let Some(threads) = config.server.threads {
        tracing::debug!(
            threads,
            "Creating Pingora server with overridden worker threads"
        );
        let mut conf = ServerConf::new()
            .ok_or_else(|| anyhow!("could not construct pingora server configuration"))?;
        conf.threads = threads;
        Server::new_with_opt_and_conf(None, conf)
    } else {
        // "None" tells Pingora to use its default settings.
        Server::new(None)?
    };

    server.bootstrap();

    let router = build_router(&config)?;

    tracing::info!(
        listen = %config.listen_addr,
        upstream = %config.upstream,
        rules = router.len(),
        websocket_rules = config.websocket_rules(),
        passthrough_rules = config.passthrough_rules(),
        static_dir = config
            .static_files
            .as_ref()
            .map(|s| s.dir.display().to_string())
            .unwrap_or_else(|| "-".to_string()),
        "starting dev proxy"
    );

    let gateway = DevGateway::new(Arc::new(router), config.static_files.clone());

    let mut svc = http_proxy_service(&server.configuration, gateway);
    svc.add_tcp(&config.listen_addr.to_string());
    server.add_service(svc);

    Ok(server)
}
