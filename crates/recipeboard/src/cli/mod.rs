//! Command-line interface for recipeboard.
//!
//! This module provides the CLI structure for the `recipes` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, FavoriteCommand, FavoritesCommand, FilterArg, FormatArg, ListCommand, SortArg,
};

/// recipes - Browse, filter and bookmark recipes
///
/// Shows the recipe board with filters, sorting, search and favorites.
/// Favorites are kept between runs.
#[derive(Debug, Parser)]
#[command(name = "recipes")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Keep favorites in memory only for this run
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render the board once
    List(ListCommand),

    /// Add or remove a favorite
    Favorite(FavoriteCommand),

    /// List favorite recipes
    Favorites(FavoritesCommand),

    /// Drive the board with typed commands
    Interactive,

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
