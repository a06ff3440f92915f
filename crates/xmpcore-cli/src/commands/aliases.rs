//! Aliases command
//!
//! Usage: xmpcore aliases [--json]

use clap::Args;
use std::collections::BTreeMap;

#[derive(Debug, Args)]
pub struct AliasesArgs {
    /// Print a JSON object of alias to actual path
    #[arg(long)]
    pub json: bool,
}

/// Execute aliases command
pub fn execute(args: AliasesArgs) -> anyhow::Result<()> {
    let registries = xmpcore::library::registries()?;
    let guard = registries.read()?;
    let table: BTreeMap<&str, String> = guard
        .aliases
        .entries()
        .map(|(alias, actual)| (alias, actual.to_string()))
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    let width = table.keys().map(|alias| alias.len()).max().unwrap_or(0);
    for (alias, actual) in &table {
        println!("{:>width$} => {}", alias, actual, width = width);
    }
    Ok(())
}
