//! Command parsing and dispatch for the terminal front end.
//!
//! Each input line parses into a [`Command`]; [`dispatch`] runs it against
//! the session's services and returns the text to print.

use crate::services::{FeedPhase, LoadOutcome};
use crate::startup::Session;
use crate::state::{FilterPatch, lock};
use crate::ui::render;
use log::debug;

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Search(String),
    Filter(FilterPatch),
    Reset,
    More,
    Favorite(String),
    Favorites,
    Show(String),
    Featured,
    Categories,
    Help,
    Quit,
}

/// What the REPL should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

/// Parses one input line. The error is a hint for the user.
pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "" | "list" | "ls" => Command::List,
        "search" | "s" => Command::Search(rest.to_string()),
        "cuisine" => Command::Filter(FilterPatch::new().cuisine(required(rest, "cuisine")?)),
        "diet" => Command::Filter(FilterPatch::new().diet(required(rest, "diet")?)),
        "maxtime" => {
            let patch = FilterPatch::new()
                .max_time_str(required(rest, "maxtime")?)
                .map_err(|_| "maxtime expects minutes or `all`".to_string())?;
            Command::Filter(patch)
        }
        "reset" => Command::Reset,
        "more" | "m" => Command::More,
        "fav" => Command::Favorite(required(rest, "fav")?.to_string()),
        "favorites" | "favs" => Command::Favorites,
        "show" | "open" => Command::Show(required(rest, "show")?.to_string()),
        "featured" => Command::Featured,
        "categories" => Command::Categories,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => {
            return Err(format!(
                "Unknown command `{}`. Type `help` for a list of commands.",
                other
            ));
        }
    };
    Ok(command)
}

fn required<'a>(value: &'a str, command: &str) -> Result<&'a str, String> {
    if value.is_empty() {
        Err(format!("`{}` needs an argument. Type `help` for usage.", command))
    } else {
        Ok(value)
    }
}

/// Runs a command and renders the resulting view.
pub async fn dispatch(session: &Session, command: Command) -> Reply {
    debug!("Dispatching {:?}", command);
    let browse = session.browse();

    let text = match command {
        Command::List => {
            if browse.snapshot().phase == FeedPhase::Idle {
                browse.reload().await;
            }
            feed_text(session)
        }
        Command::Search(text) => {
            browse.set_search(text).await;
            feed_text(session)
        }
        Command::Filter(patch) => {
            browse.apply_filters(patch).await;
            feed_text(session)
        }
        Command::Reset => {
            browse.reset_filters().await;
            feed_text(session)
        }
        Command::More => match session.load_more().await {
            LoadOutcome::Skipped => "No more recipes to load.\n".to_string(),
            _ => feed_text(session),
        },
        Command::Favorite(id) => {
            let added = lock(session.state()).toggle_favorite(&id);
            if added {
                format!("Added {} to favorites.\n", id)
            } else {
                format!("Removed {} from favorites.\n", id)
            }
        }
        Command::Favorites => {
            let view = session.favorites_view().await;
            session.details().prime(view.catalog());
            render::render_favorites(&view.visible(), view.source(), view.error())
        }
        Command::Show(id) => {
            let view = session.details().open(&id).await;
            let favorite = lock(session.state()).is_favorite(&id);
            render::render_detail(&view, favorite)
        }
        Command::Featured => {
            let recipes = session.details().featured().await;
            let state = lock(session.state());
            render::render_featured(&recipes, state.favorites())
        }
        Command::Categories => match session.api().fetch_categories().await {
            Ok(categories) => render::render_categories(&categories),
            Err(e) => format!("! Failed to load categories: {}\n", e),
        },
        Command::Help => render::HELP.to_string(),
        Command::Quit => return Reply::Quit,
    };
    Reply::Text(text)
}

fn feed_text(session: &Session) -> String {
    let snapshot = session.browse().snapshot();
    session.details().prime(&snapshot.recipes);
    let state = lock(session.state());
    render::render_feed(&snapshot, state.favorites(), state.filters())
}
