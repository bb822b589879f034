//! `recipes` - CLI for recipeboard
//!
//! This binary renders the recipe board, manages favorites and runs the
//! interactive session.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use recipeboard::cli::{
    Cli, Command, ConfigCommand, FavoriteCommand, FavoritesCommand, ListCommand,
};
use recipeboard::render::{HtmlRenderer, JsonRenderer, RecordingRenderer, TextRenderer};
use recipeboard::{
    init_logging, session, BoardOptions, Catalog, Config, FilterCriterion, KeyValueStore,
    MemoryStore, OutputFormat, RecipeBoard, Renderer, Storage,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    // Execute the command
    match cli.command {
        Command::List(list_cmd) => handle_list(&config, cli.ephemeral, &list_cmd),
        Command::Favorite(favorite_cmd) => handle_favorite(&config, cli.ephemeral, &favorite_cmd),
        Command::Favorites(favorites_cmd) => {
            handle_favorites(&config, cli.ephemeral, &favorites_cmd)
        }
        Command::Interactive => handle_interactive(&config, cli.ephemeral),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn open_store(config: &Config, ephemeral: bool) -> anyhow::Result<Box<dyn KeyValueStore>> {
    if ephemeral {
        debug!("Using in-memory favorites store");
        return Ok(Box::new(MemoryStore::new()));
    }
    let path = config.database_path();
    let storage = Storage::open(&path)
        .with_context(|| format!("failed to open favorites database {}", path.display()))?;
    Ok(Box::new(storage))
}

fn open_board<R: Renderer>(
    config: &Config,
    ephemeral: bool,
    renderer: R,
) -> anyhow::Result<RecipeBoard<R>> {
    let mut board = RecipeBoard::new(
        Catalog::builtin(),
        open_store(config, ephemeral)?,
        renderer,
        BoardOptions::from(config),
    );
    board.initialize()?;
    Ok(board)
}

fn handle_list(config: &Config, ephemeral: bool, cmd: &ListCommand) -> anyhow::Result<()> {
    let mut board = open_board(config, ephemeral, RecordingRenderer::new())?;

    if let Some(query) = &cmd.search {
        board.search(query)?;
    }
    if let Some(filter) = cmd.filter {
        board.filter(filter.into())?;
    }
    if let Some(sort) = cmd.sort {
        board.sort(sort.into())?;
    }

    let frame = board.frame();
    let stdout = io::stdout();
    match cmd.format.map_or(config.view.format, OutputFormat::from) {
        OutputFormat::Plain => TextRenderer::new(stdout).render(&frame)?,
        OutputFormat::Html => HtmlRenderer::new(stdout).render(&frame)?,
        OutputFormat::Json => JsonRenderer::new(stdout).render(&frame)?,
    }
    Ok(())
}

fn handle_favorite(config: &Config, ephemeral: bool, cmd: &FavoriteCommand) -> anyhow::Result<()> {
    let mut board = open_board(config, ephemeral, RecordingRenderer::new())?;
    let favorite = board.toggle_favorite(cmd.id)?;

    let title = board
        .catalog()
        .get(cmd.id)
        .map_or_else(String::new, |r| r.title.clone());
    if favorite {
        println!("Added {title} to favorites");
    } else {
        println!("Removed {title} from favorites");
    }
    Ok(())
}

fn handle_favorites(
    config: &Config,
    ephemeral: bool,
    cmd: &FavoritesCommand,
) -> anyhow::Result<()> {
    let mut board = open_board(config, ephemeral, RecordingRenderer::new())?;
    board.filter(FilterCriterion::Favorites)?;
    let frame = board.frame();

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&frame.cards)?);
    } else if frame.cards.is_empty() {
        println!("No favorites yet.");
    } else {
        for card in &frame.cards {
            println!("[{}] {} ({} min, {})", card.id, card.title, card.time, card.difficulty);
        }
    }
    Ok(())
}

fn handle_interactive(config: &Config, ephemeral: bool) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    println!("Type 'help' for a list of commands.");
    let stdout = io::stdout();
    let summary = match config.view.format {
        OutputFormat::Plain => run_session(config, ephemeral, &runtime, TextRenderer::new(stdout)),
        OutputFormat::Html => run_session(config, ephemeral, &runtime, HtmlRenderer::new(stdout)),
        OutputFormat::Json => run_session(config, ephemeral, &runtime, JsonRenderer::new(stdout)),
    }?;
    debug!(?summary, "Interactive session finished");
    Ok(())
}

fn run_session<R: Renderer>(
    config: &Config,
    ephemeral: bool,
    runtime: &tokio::runtime::Runtime,
    renderer: R,
) -> anyhow::Result<session::SessionSummary> {
    let mut board = open_board(config, ephemeral, renderer)?;
    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let mut out = io::stdout();
    let summary = runtime.block_on(session::run(&mut board, input, &mut out))?;
    Ok(summary)
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Favorites key:      {}", config.storage.favorites_key);
                println!();
                println!("[Search]");
                println!("  Debounce (ms):      {}", config.search.debounce_ms);
                println!();
                println!("[View]");
                println!("  Quick under (min):  {}", config.view.quick_max_minutes);
                println!("  Format:             {:?}", config.view.format);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
