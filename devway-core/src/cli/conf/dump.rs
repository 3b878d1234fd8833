use crate::conf::{RuntimeConfig, load_config};
use std::path::PathBuf;

/// Print the resolved configuration, JSON unless `--yaml` is given.
pub fn dump(path: Option<PathBuf>, yaml: bool) -> anyhow::Result<()> {
    let cfg = load_config(path.as_deref())?;
    println!("{}", render_config(&cfg, yaml)?);
    Ok(())
}

pub fn render_config(cfg: &RuntimeConfig, yaml: bool) -> anyhow::Result<String> {
    let s = if yaml {
        serde_yaml::to_string(cfg)?
    } else {
        serde_json::to_string_pretty(cfg)?
    };
    Ok(s)
}
