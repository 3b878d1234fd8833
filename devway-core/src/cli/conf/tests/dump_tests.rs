use crate::cli::conf::{ConfigCmd, render_config};
use crate::conf::load_config_str;
use clap::Parser;
use pretty_assertions::assert_eq;

#[derive(Parser, Debug)]
struct ConfigCli {
    #[command(subcommand)]
    cmd: ConfigCmd,
}

#[test]
fn json_is_the_default_rendering() {
    // Arrange
    let cfg = load_config_str("upstream = \"http://192.168.2.2/\"", None).unwrap();

    // Act
    let out = render_config(&cfg, false).unwrap();

    // Assert
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["upstream"], "http://192.168.2.2/");
    assert_eq!(value["listen_addr"], "127.0.0.1:8080");
}

#[test]
fn yaml_rendering_is_selected_by_flag() {
    // Arrange
    let cfg = load_config_str("upstream = \"http://192.168.2.2/\"", None).unwrap();

    // Act
    let out = render_config(&cfg, true).unwrap();

    // Assert
    assert!(out.contains("upstream:"), "{out}");
    assert!(out.contains("http://192.168.2.2/"), "{out}");
    assert!(serde_json::from_str::<serde_json::Value>(&out).is_err());
}

#[test]
fn json_flag_is_accepted_and_selects_json() {
    // Act
    let cli = ConfigCli::try_parse_from(["config", "dump", "--json"]).unwrap();

    // Assert
    match cli.cmd {
        ConfigCmd::Dump { path, json, yaml } => {
            assert!(path.is_none());
            assert!(json);
            assert!(!yaml);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn json_and_yaml_flags_conflict() {
    // Act
    let res = ConfigCli::try_parse_from(["config", "dump", "--json", "--yaml"]);

    // Assert
    assert!(res.is_err());
}
