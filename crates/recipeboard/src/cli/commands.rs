//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::config::OutputFormat;
use crate::recipe::Difficulty;
use crate::view::{FilterCriterion, SortKey};

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only show recipes matching this filter
    #[arg(short, long, value_enum)]
    pub filter: Option<FilterArg>,

    /// Order the shown recipes
    #[arg(short, long, value_enum)]
    pub sort: Option<SortArg>,

    /// Only show recipes whose title, category or ingredients contain this text
    #[arg(long, conflicts_with = "filter")]
    pub search: Option<String>,

    /// Output format (defaults to the configured format)
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
}

/// Favorite command arguments.
#[derive(Debug, Args)]
pub struct FavoriteCommand {
    /// Id of the recipe to add or remove
    pub id: u32,
}

/// Favorites command arguments.
#[derive(Debug, Args)]
pub struct FavoritesCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Filter argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    /// Every recipe
    All,
    /// Easy recipes
    Easy,
    /// Medium recipes
    Medium,
    /// Hard recipes
    Hard,
    /// Recipes under the quick threshold
    Quick,
    /// Favorite recipes
    Favorites,
}

impl From<FilterArg> for FilterCriterion {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => Self::All,
            FilterArg::Easy => Self::Difficulty(Difficulty::Easy),
            FilterArg::Medium => Self::Difficulty(Difficulty::Medium),
            FilterArg::Hard => Self::Difficulty(Difficulty::Hard),
            FilterArg::Quick => Self::Quick,
            FilterArg::Favorites => Self::Favorites,
        }
    }
}

/// Sort argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    /// Alphabetical by title
    Name,
    /// Fastest first
    Time,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => Self::Name,
            SortArg::Time => Self::Time,
        }
    }
}

/// Output format argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Plain text cards
    Plain,
    /// HTML card markup
    Html,
    /// JSON
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Plain => Self::Plain,
            FormatArg::Html => Self::Html,
            FormatArg::Json => Self::Json,
        }
    }
}
