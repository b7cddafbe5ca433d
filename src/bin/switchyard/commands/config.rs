//! `switchyard config` command

use anyhow::Result;

use super::{load_settings, settings_paths};

pub fn execute() -> Result<()> {
    let (global, project) = settings_paths()?;
    let config = load_settings()?;

    match global {
        Some(ref path) => print_source("global", path),
        None => println!("# global: no home directory"),
    }
    print_source("project", &project);
    println!();
    print!("{}", config.to_toml()?);

    Ok(())
}

fn print_source(label: &str, path: &std::path::Path) {
    let state = if path.exists() { "loaded" } else { "not found" };
    println!("# {}: {} ({})", label, path.display(), state);
}
