//! XMP Core CLI
//!
//! Diagnostic front end for the XMP property-tree core

use clap::{Parser, Subcommand};
use xmpcore::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "xmpcore")]
#[command(about = "XMP Core - property tree diagnostics", long_about = None)]
struct Cli {
    /// Emit debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Dump the namespace prefix to URI map
    Namespaces(commands::namespaces::NamespacesArgs),
    /// List the built-in aliases
    Aliases(commands::aliases::AliasesArgs),
    /// Decode an option word
    Flags(commands::flags::FlagsArgs),
    /// Build, sort and dump a sample metadata object
    Demo(commands::demo::DemoArgs),
}

fn main() {
    let cli = Cli::parse();
    if cli.verbose {
        logging_facility::init(Profile::Development);
    }

    let result = xmpcore::library::initialize()
        .map_err(anyhow::Error::from)
        .and_then(|()| {
            let outcome = match cli.command {
                Commands::Namespaces(args) => commands::namespaces::execute(args),
                Commands::Aliases(args) => commands::aliases::execute(args),
                Commands::Flags(args) => commands::flags::execute(args),
                Commands::Demo(args) => commands::demo::execute(args),
            };
            xmpcore::library::terminate();
            outcome
        });

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
