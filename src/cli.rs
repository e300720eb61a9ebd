//! CLI argument definitions for the prefs binary

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Inspect and edit preferences files
#[derive(Parser, Debug)]
#[command(name = "prefs")]
#[command(about = "Inspect, edit and migrate hierarchical preferences files")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a preferences file as JSON
    Show {
        /// Preferences file (JSON or legacy XML)
        file: PathBuf,
    },
    /// Print the value at a dotted path
    Get {
        file: PathBuf,
        /// Dotted path, e.g. window.geometry.width
        path: String,
    },
    /// Set the value at a dotted path and save the file
    Set {
        file: PathBuf,
        path: String,
        /// Literal value: 12, 0.5, True, 'text'; anything else is stored as text
        value: String,
    },
    /// Convert a legacy XML preferences file to JSON
    Migrate {
        /// Legacy file to read
        legacy: PathBuf,
        /// JSON file to write
        output: PathBuf,
    },
    /// Print the preferences directory
    Dir(DirArgs),
}

/// Arguments for the dir command
#[derive(clap::Args, Debug)]
pub struct DirArgs {
    /// Name of the application core
    #[arg(short, long)]
    pub core: Option<String>,

    /// Resolve the shared network directory instead of the local one
    #[arg(short, long)]
    pub network: bool,

    /// Local directory template ({core} is substituted)
    #[arg(long, env = "PREFS_LOCAL_PATH")]
    pub local_template: Option<String>,

    /// Network directory template ({core} is substituted)
    #[arg(long, env = "PREFS_NETWORK_PATH")]
    pub network_template: Option<String>,
}
