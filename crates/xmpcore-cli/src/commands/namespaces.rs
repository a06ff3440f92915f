//! Namespaces command
//!
//! Usage: xmpcore namespaces [--json]

use anyhow::Context;
use clap::Args;
use std::collections::BTreeMap;

#[derive(Debug, Args)]
pub struct NamespacesArgs {
    /// Print a JSON object of prefix to URI instead of the text dump
    #[arg(long)]
    pub json: bool,
}

/// Execute namespaces command
pub fn execute(args: NamespacesArgs) -> anyhow::Result<()> {
    if !args.json {
        xmpcore::library::dump_namespaces(&mut |text| print!("{}", text))
            .context("dumping namespaces")?;
        return Ok(());
    }

    let registries = xmpcore::library::registries()?;
    let guard = registries.read()?;
    let table: BTreeMap<&str, &str> = guard.namespaces.iter().collect();
    println!("{}", serde_json::to_string_pretty(&table)?);
    Ok(())
}
