//! `recipeboard` - A recipe board with filters, sorting, search and favorites
//!
//! This library provides the board component, its view model, the renderers
//! that draw it, and the key-value storage that keeps favorites between runs.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod board;
pub mod cli;
pub mod config;
pub mod debounce;
pub mod error;
pub mod favorites;
pub mod logging;
pub mod recipe;
pub mod render;
pub mod session;
pub mod storage;
pub mod view;

pub use board::{BoardOptions, RecipeBoard};
pub use config::{Config, OutputFormat};
pub use error::{Error, Result};
pub use favorites::FavoritesSet;
pub use logging::init_logging;
pub use recipe::{Catalog, Difficulty, Recipe};
pub use render::{BoardFrame, Renderer};
pub use storage::{KeyValueStore, MemoryStore, Storage};
pub use view::{FilterCriterion, SortKey, ViewState};
