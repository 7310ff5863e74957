//! swatch CLI
//!
//! Terminal host for editing a theme of referencing attributes.
//!
//! ## Commands
//!
//! - `show [GROUP]`: list groups and attributes
//! - `get <KEY>`: show one attribute
//! - `set <KEY> <VALUE>`: commit a new raw input and propagate it
//! - `check <KEY> <VALUE>`: validate a raw input without committing
//! - `export`: print the saved state as JSON or YAML
//! - `reset`: forget saved edits
//!
//! Edits are saved to the state file after every successful `set`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::{ExportFormat, Host};

#[derive(Parser)]
#[command(name = "swatch")]
#[command(author, version, about = "Edit theme attributes that reference each other", long_about = None)]
struct Cli {
    /// State file holding saved edits
    #[arg(long, global = true, env = "SWATCH_STATE", default_value = "swatch-state.json")]
    state: PathBuf,

    /// YAML catalog to seed from (default: built-in catalog)
    #[arg(long, global = true, env = "SWATCH_CATALOG")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List groups and their attributes
    Show {
        /// Only show this group
        group: Option<String>,
    },

    /// Show one attribute
    Get {
        /// Attribute key, e.g. colors.primary
        key: String,
    },

    /// Set an attribute's raw input and update everything referencing it
    Set {
        /// Attribute key, e.g. colors.primary
        key: String,

        /// New raw input, may contain {group.name} references
        value: String,
    },

    /// Validate a raw input without committing it
    Check {
        /// Attribute key, e.g. colors.primary
        key: String,

        /// Candidate raw input
        value: String,
    },

    /// Print the current state
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
    },

    /// Discard saved edits and return to the catalog defaults
    Reset,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let host = Host::new(cli.state, cli.catalog);

    let output = match cli.command {
        Commands::Show { group } => host.show(group.as_deref())?,
        Commands::Get { key } => host.get(&key)?,
        Commands::Set { key, value } => host.set(&key, &value)?,
        Commands::Check { key, value } => host.check(&key, &value)?,
        Commands::Export { format } => host.export(format)?,
        Commands::Reset => host.reset()?,
    };

    print!("{output}");
    Ok(())
}
