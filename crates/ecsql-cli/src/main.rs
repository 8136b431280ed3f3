//! ECSQL command-line interface

mod finalize;
mod output;
mod signatures;

use clap::{Parser, Subcommand};
use output::{ColorMode, OutputFormat};
use std::path::PathBuf;

/// ECSQL expression tool
#[derive(Parser)]
#[command(name = "ecsql")]
#[command(author, version, about = "ECSQL expression typing tools", long_about = None)]
struct Cli {
    /// Color output
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    color: ColorMode,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Type-check a JSON expression tree and print it as ECSQL
    Finalize {
        /// Expression tree file (JSON)
        tree: PathBuf,

        /// Schema file (JSON)
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Render positional parameters with generated names
        #[arg(long)]
        named_params: bool,

        /// Check blob arguments the legacy way (default)
        #[arg(long, conflicts_with = "strict_blob_check")]
        legacy_blob_check: bool,

        /// Accept binary or geometry values for blob arguments
        #[arg(long)]
        strict_blob_check: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List the built-in function signatures or check a declaration file
    Signatures {
        /// File with one signature declaration per line
        #[arg(long)]
        check: Option<PathBuf>,
    },
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();
    output::setup_colors(cli.color);

    let result = match cli.command {
        Commands::Finalize {
            tree,
            schema,
            named_params,
            legacy_blob_check: _,
            strict_blob_check,
            format,
        } => finalize::finalize(finalize::FinalizeConfig {
            tree,
            schema,
            named_params,
            strict_blob_check,
            format,
        }),

        Commands::Signatures { check } => {
            signatures::signatures(signatures::SignaturesConfig { check })
        }
    };

    if let Err(e) = result {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_blob_check_flags_conflict() {
        let parsed = Cli::try_parse_from([
            "ecsql",
            "finalize",
            "tree.json",
            "--legacy-blob-check",
            "--strict-blob-check",
        ]);
        assert!(parsed.is_err());
    }
}
