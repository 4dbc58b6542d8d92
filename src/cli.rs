//! CLI definitions for autofill.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Autofill CLI.
#[derive(Parser)]
#[command(name = "autofill")]
#[command(about = "Profile-driven web form auto-filler")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (defaults to the user config directory)
    #[arg(short, long, global = true, env = "AUTOFILL_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Fill a page fixture and print the fill result
    Fill {
        /// Profile JSON (defaults to profile.path from the config)
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Page fixture JSON
        #[arg(short, long)]
        form: PathBuf,

        /// Write the filled page fixture here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the dictionary entry a question would be answered with
    Match {
        /// Question text as shown on the form
        question: String,

        #[arg(short, long)]
        profile: Option<PathBuf>,
    },

    /// Print the flat dictionary built from a profile
    Dictionary {
        #[arg(short, long)]
        profile: Option<PathBuf>,
    },

    /// Print the field mapping table
    Mappings,
}
