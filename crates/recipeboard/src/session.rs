//! Interactive session loop.
//!
//! Reads one command per line and drives a [`RecipeBoard`]. The loop waits on
//! two events at once: the next input line and the deadline of the pending
//! typed search. Whichever comes first is handled to completion before the
//! next wait, so board operations never overlap.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use crate::board::RecipeBoard;
use crate::error::Result;
use crate::render::{ControlGroup, Renderer, SectionId};

/// Help text printed by the `help` command.
pub const HELP: &str = "\
Commands:
  filter <all|easy|medium|hard|quick|favorites>  Show matching recipes
  sort <name|time>                               Reorder the shown recipes
  type <text>                                    Type into the search box
  search <text>                                  Search right away
  fav <id>                                       Add or remove a favorite
  toggle <steps-ID|ingredients-ID>               Show or hide a panel
  show                                           Redraw the board
  help                                           Show this help
  quit                                           Leave";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Press a filter control.
    Filter(String),
    /// Press a sort control.
    Sort(String),
    /// A keystroke in the search box; carries the whole box text.
    Type(String),
    /// Search immediately.
    Search(String),
    /// Toggle a favorite by raw id.
    Favorite(String),
    /// Toggle a panel by raw section id.
    Toggle(String),
    /// Redraw.
    Show,
    /// Print help.
    Help,
    /// End the session.
    Quit,
    /// Anything else.
    Unknown(String),
}

impl SessionCommand {
    /// Parse a line. Blank lines yield `None`.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let arg = rest.trim().to_string();

        Some(match word.to_lowercase().as_str() {
            "filter" => Self::Filter(arg),
            "sort" => Self::Sort(arg),
            "type" => Self::Type(arg),
            "search" => Self::Search(arg),
            "fav" | "favorite" => Self::Favorite(arg),
            "toggle" => Self::Toggle(arg),
            "show" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(word.to_string()),
        })
    }
}

/// Counters reported when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Non-blank lines handled.
    pub commands: usize,
    /// Searches applied, typed or immediate.
    pub searches: usize,
}

enum Flow {
    Continue,
    Quit,
}

/// Run a session until `quit` or end of input.
///
/// Renderer output goes wherever the board's renderer writes; help text,
/// hints and rejected input go to `out`. At end of input a pending typed
/// search runs before returning. `quit` discards it.
///
/// # Errors
///
/// Returns an error if input cannot be read, output cannot be written, or
/// storage fails. Unknown recipes and sections are reported to `out` and the
/// session continues.
pub async fn run<R, I, W>(
    board: &mut RecipeBoard<R>,
    input: I,
    out: &mut W,
) -> Result<SessionSummary>
where
    R: Renderer,
    I: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut summary = SessionSummary::default();

    loop {
        let deadline = board.search_deadline();
        let due = async move {
            match deadline {
                Some(at) => sleep_until(at).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    if board.flush_search()?.is_some() {
                        summary.searches += 1;
                    }
                    debug!("Input closed");
                    break;
                };
                let Some(command) = SessionCommand::parse(&line) else {
                    continue;
                };
                summary.commands += 1;
                if let Flow::Quit = handle(board, command, out, &mut summary)? {
                    break;
                }
            }
            () = due => {
                if board.fire_due_search(Instant::now())?.is_some() {
                    summary.searches += 1;
                }
            }
        }
    }

    info!(
        commands = summary.commands,
        searches = summary.searches,
        "Session ended"
    );
    Ok(summary)
}

fn handle<R: Renderer, W: Write>(
    board: &mut RecipeBoard<R>,
    command: SessionCommand,
    out: &mut W,
    summary: &mut SessionSummary,
) -> Result<Flow> {
    debug!(?command, "Handling command");
    let outcome = match command {
        SessionCommand::Filter(value) => board.press_control(ControlGroup::Filters, &value),
        SessionCommand::Sort(value) => board.press_control(ControlGroup::Sorts, &value),
        SessionCommand::Type(text) => {
            board.input_search(&text, Instant::now());
            Ok(())
        }
        SessionCommand::Search(text) => {
            board.cancel_search();
            summary.searches += 1;
            board.search(&text)
        }
        SessionCommand::Favorite(raw) => match raw.parse::<u32>() {
            Ok(id) => board.toggle_favorite(id).and_then(|favorite| {
                if favorite {
                    writeln!(out, "Recipe {id} is now a favorite")?;
                } else {
                    writeln!(out, "Recipe {id} is no longer a favorite")?;
                }
                Ok(())
            }),
            Err(_) => {
                writeln!(out, "Not a recipe id: '{raw}'")?;
                Ok(())
            }
        },
        SessionCommand::Toggle(raw) => raw
            .parse::<SectionId>()
            .and_then(|section| board.toggle_section(section))
            .map(|_| ()),
        SessionCommand::Show => board.render(),
        SessionCommand::Help => {
            writeln!(out, "{HELP}")?;
            Ok(())
        }
        SessionCommand::Quit => return Ok(Flow::Quit),
        SessionCommand::Unknown(word) => {
            writeln!(
                out,
                "Unknown command '{word}'. Type 'help' for a list of commands."
            )?;
            Ok(())
        }
    };

    match outcome {
        Err(e) if e.is_not_found() => {
            writeln!(out, "{e}")?;
            Ok(Flow::Continue)
        }
        Err(e) => Err(e),
        Ok(()) => Ok(Flow::Continue),
    }
}
