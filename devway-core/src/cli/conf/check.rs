use crate::conf::{ConfigError, RuntimeConfig, load_config};
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub fn check(path: Option<PathBuf>, plain: bool) -> anyhow::Result<()> {
    match load_config(path.as_deref()) {
        Ok(cfg) => {
            print_summary(&cfg, plain);
            Ok(())
        }
        Err(err) => {
            print_config_error(&err, plain);
            std::process::exit(1);
        }
    }
}

fn print_summary(cfg: &RuntimeConfig, plain: bool) {
    let mark = if plain {
        "ok".to_string()
    } else {
        "✔".green().to_string()
    };

    let table = if cfg.default_rules {
        "built-in"
    } else {
        "configured"
    };
    let static_dir = cfg
        .static_files
        .as_ref()
        .map(|s| s.dir.display().to_string())
        .unwrap_or_else(|| "none".to_string());

    println!("{mark} Config loaded successfully");
    println!("{mark} listen {}", cfg.listen_addr);
    println!("{mark} upstream {}", cfg.upstream);
    println!("{mark} {} rules ({table})", cfg.rules.len());
    println!("{mark} {} websocket rules", cfg.websocket_rules());
    println!("{mark} {} passthrough rules", cfg.passthrough_rules());
    println!("{mark} static files: {static_dir}");
}

fn print_config_error(err: &ConfigError, plain: bool) {
    if plain {
        eprintln!("error: {err}");
    } else {
        eprintln!();
        eprintln!("{}: {err}", "error".red().bold());
    }

    if let Some(hint) = config_error_hint(err) {
        eprintln!();
        eprintln!("{hint}");
    }
}

pub fn config_error_hint(err: &ConfigError) -> Option<&'static str> {
    match err {
        ConfigError::MissingFile { .. } => Some(
            "The config file given on the command line does not exist.\n\
             \n\
             Omit the path to run with the built-in defaults.",
        ),

        ConfigError::InvalidListen { .. } => Some(
            "The listen address must be an IP address and port.\n\
             \n\
             Example:\n\
             \n\
             [server]\n\
             listen = \"127.0.0.1:8080\"",
        ),

        ConfigError::InvalidThreads => Some(
            "Remove `threads` to use the Pingora default, or set it to at least 1.",
        ),

        ConfigError::InvalidUpstream { .. } => Some(
            "The upstream must be an http or https URL without query or fragment.\n\
             \n\
             Example:\n\
             \n\
             upstream = \"http://192.168.2.2/\"\n\
             \n\
             DEVWAY_UPSTREAM overrides this value.",
        ),

        ConfigError::EmptyPattern { .. } | ConfigError::InvalidPattern { .. } => Some(
            "Rule patterns are regular expressions matched against the request path.\n\
             \n\
             Example:\n\
             \n\
             [[rule]]\n\
             pattern = \"^/mavlink\"",
        ),

        ConfigError::ConflictingRuleFlags { .. } => Some(
            "A rule may forward WebSocket upgrades or relay streamed bodies, not both.\n\
             \n\
             Split it into two rules with narrower patterns.",
        ),

        ConfigError::InvalidStaticDir { .. } => Some(
            "`static_files.dir` must point to an existing directory, usually the frontend build output.",
        ),

        _ => None,
    }
}
