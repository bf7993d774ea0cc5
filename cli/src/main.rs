#![deny(missing_docs)]

//! # Contentdoc CLI
//!
//! Command Line Interface for the content-model documentation generator.
//!
//! Supported Commands:
//! - `spec`: Emits the OpenAPI (Swagger 2.0) document.
//! - `schema`: Emits the JSON Schema of one entity type or bundle.
//! - `types`: Emits entity type / bundle discovery listings.
//! - `serve`: Serves all of the above plus Swagger UI pages over HTTP.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod args;
mod error;
mod output;
mod schema;
#[cfg(feature = "server")]
mod serve;
mod spec;
#[cfg(test)]
mod testing;
mod types;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Content model documentation generator")]
struct Cli {
    /// Log debug output (overridden by RUST_LOG).
    #[clap(long, short, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the OpenAPI document.
    Spec(spec::SpecArgs),
    /// Generate the JSON Schema of an entity type or bundle.
    Schema(schema::SchemaArgs),
    /// List entity types, or describe one entity type or bundle.
    Types(types::TypesArgs),
    /// Serve documents and documentation pages over HTTP.
    #[cfg(feature = "server")]
    Serve(serve::ServeArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Spec(args) => spec::execute(args)?,
        Commands::Schema(args) => schema::execute(args)?,
        Commands::Types(args) => types::execute(args)?,
        #[cfg(feature = "server")]
        Commands::Serve(args) => serve::execute(args)?,
    }

    Ok(())
}
