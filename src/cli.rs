//! CLI definitions for snakeshot.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// snakeshot CLI.
#[derive(Parser)]
#[command(name = "snakeshot")]
#[command(about = "Record scripted snake duels and report visual divergence")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        env = "SNAKESHOT_CONFIG",
        default_value = "config/snakeshot.toml",
        global = true
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Play one session as a configured player and record its frames
    Play {
        /// Player name from [[players]]
        #[arg(short, long)]
        player: String,
    },

    /// Play the first two configured players against each other concurrently
    Duel,

    /// Compare two recordings and write the diff log and HTML report
    Compare {
        /// First recording (default: first non-diff directory under frames_dir)
        #[arg(requires = "dir_b")]
        dir_a: Option<PathBuf>,

        /// Second recording
        dir_b: Option<PathBuf>,
    },

    /// Validate the configuration file and print warnings
    ConfigCheck,
}
