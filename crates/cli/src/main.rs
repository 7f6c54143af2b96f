use std::{io, path::PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod logging;
mod modules;

/// Assemble object graphs from JSON or YAML documents and run them.
#[derive(Parser, Debug)]
#[command(name = "graphwright", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the objects described by a document and invoke their methods.
    Run {
        /// Path to a .json, .yaml or .yml document.
        document: PathBuf,
    },
    /// Write an example document for the named classes.
    Gen {
        /// Registered class names; repeat a name to get several examples.
        #[arg(required = true)]
        classes: Vec<String>,
        /// Output file.
        #[arg(short, long, default_value = "./output.json")]
        output: PathBuf,
    },
    /// List registered classes whose name contains FILTER.
    Show {
        #[arg(default_value = "")]
        filter: String,
        /// Print an example config and the parameter docs of each match.
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let registry = modules::builtin_registry()?;

    match cli.command {
        Command::Run { document } => {
            commands::run::run(&registry, &document, logging::init_tracing)?;
        }
        Command::Gen { classes, output } => {
            logging::init_tracing(None)?;
            commands::generate::generate(&registry, &classes, &output)?;
        }
        Command::Show { filter, verbose } => {
            logging::init_tracing(None)?;
            commands::show::show(&registry, &filter, verbose, &mut io::stdout().lock())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn gen_defaults_output_path() {
        let cli = Cli::try_parse_from(["graphwright", "gen", "Student", "Student"]).expect("parse");
        match cli.command {
            Command::Gen { classes, output } => {
                assert_eq!(classes, vec!["Student", "Student"]);
                assert_eq!(output, PathBuf::from("./output.json"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn show_accepts_missing_filter() {
        let cli = Cli::try_parse_from(["graphwright", "show", "-v"]).expect("parse");
        assert!(matches!(cli.command, Command::Show { ref filter, verbose: true } if filter.is_empty()));
    }
}
