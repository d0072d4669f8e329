//! Line-oriented command shell driving a [`Session`]

use std::sync::Arc;

use anyhow::{anyhow, bail};
use ed_core::{RowSource, Session, UiEvent, ViewKey, ViewType};
use ed_views::OverviewView;
use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::text_surface::TextSurface;

pub const HELP: &str = "\
commands:
  search <text>          filter the grid (empty text clears)
  board <name>           limit school results to one board (empty clears)
  aggregate on|off       list board totals instead of schools
  select <n>             focus row n of the current grid page
  page <n>               show page n of the grid
  back                   clear the focus
  tab history|ranking    switch tabs
  reload                 re-read the data file
  status                 show focus and search readiness
  help                   show this text
  quit                   exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Event(UiEvent),
    Select(usize),
    Page(usize),
    Reload,
    Status,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> anyhow::Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word {
            "search" | "s" => Command::Event(UiEvent::SearchChanged(rest.to_string())),
            "board" | "b" => Command::Event(UiEvent::BoardScopeChanged(rest.to_string())),
            "aggregate" => match rest {
                "on" => Command::Event(UiEvent::AggregateToggled(true)),
                "off" => Command::Event(UiEvent::AggregateToggled(false)),
                _ => bail!("expected 'aggregate on' or 'aggregate off'"),
            },
            "select" => Command::Select(position(rest)?),
            "page" => Command::Page(position(rest)?),
            "back" => Command::Event(UiEvent::Back),
            "tab" => match rest {
                "history" => Command::Event(UiEvent::ViewTypeChanged(ViewType::History)),
                "ranking" => Command::Event(UiEvent::ViewTypeChanged(ViewType::Ranking)),
                _ => bail!("expected 'tab history' or 'tab ranking'"),
            },
            "reload" => Command::Reload,
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            "" => bail!("empty command"),
            other => bail!("unknown command '{}'", other),
        };
        Ok(command)
    }
}

/// Parse a one-based position into a zero-based index.
fn position(text: &str) -> anyhow::Result<usize> {
    let n: usize = text.parse().map_err(|_| anyhow!("expected a row number, got '{}'", text))?;
    n.checked_sub(1).ok_or_else(|| anyhow!("rows are numbered from 1"))
}

/// Read commands from stdin until `quit` or end of input.
pub async fn run(session: &Session, surface: &Arc<Mutex<TextSurface>>, source: &dyn RowSource) -> anyhow::Result<()> {
    println!("{}", surface.lock().render());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("{}", err);
                continue;
            }
        };

        // Engine errors mean views and data disagree; they end the session.
        match execute(session, source, command).await? {
            Flow::Quit => break,
            Flow::Render => println!("{}", surface.lock().render()),
            Flow::Message(message) => println!("{}", message),
        }
    }

    info!("Shell closed");
    Ok(())
}

enum Flow {
    Render,
    Message(String),
    Quit,
}

async fn execute(session: &Session, source: &dyn RowSource, command: Command) -> anyhow::Result<Flow> {
    match command {
        Command::Event(event) => {
            session.dispatch(event)?;
            Ok(Flow::Render)
        }
        Command::Select(index) => {
            let selection = session.with_views(|views| {
                views
                    .view_as::<OverviewView>(ViewKey::Overview)
                    .and_then(|grid| grid.selection_at(index))
            });
            let Some(selection) = selection else {
                warn!(row = index + 1, "No such row on the current page");
                return Ok(Flow::Message(format!("no row {} on this page", index + 1)));
            };
            session.dispatch(UiEvent::Selected(selection))?;
            Ok(Flow::Render)
        }
        Command::Page(page) => {
            session.with_views(|views| {
                if let Some(grid) = views
                    .view_mut(ViewKey::Overview)
                    .and_then(|view| view.as_any_mut().downcast_mut::<OverviewView>())
                {
                    grid.set_page(page);
                }
            });
            Ok(Flow::Render)
        }
        Command::Reload => {
            let raw = source.load().await?;
            session.reload(raw).await?;
            Ok(Flow::Render)
        }
        Command::Status => {
            let (focus, route) = session.with_state(|state| (format!("{:?}", state.focus()), state.active_route()));
            let ready = if session.search_ready() { "ready" } else { "building" };
            Ok(Flow::Message(format!("focus: {}\nview: {:?}\nsearch: {}", focus, route, ready)))
        }
        Command::Help => Ok(Flow::Message(HELP.to_string())),
        Command::Quit => Ok(Flow::Quit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_events() {
        assert_eq!(
            Command::parse("search  maple public ").unwrap(),
            Command::Event(UiEvent::SearchChanged("maple public".to_string()))
        );
        assert_eq!(
            Command::parse("board").unwrap(),
            Command::Event(UiEvent::BoardScopeChanged(String::new()))
        );
        assert_eq!(
            Command::parse("aggregate on").unwrap(),
            Command::Event(UiEvent::AggregateToggled(true))
        );
        assert_eq!(
            Command::parse("tab ranking").unwrap(),
            Command::Event(UiEvent::ViewTypeChanged(ViewType::Ranking))
        );
        assert_eq!(Command::parse("back").unwrap(), Command::Event(UiEvent::Back));
    }

    #[test]
    fn test_positions_are_one_based() {
        assert_eq!(Command::parse("select 1").unwrap(), Command::Select(0));
        assert_eq!(Command::parse("page 3").unwrap(), Command::Page(2));
        assert!(Command::parse("select 0").is_err());
        assert!(Command::parse("select two").is_err());
    }

    #[test]
    fn test_rejects_unknown_input() {
        assert!(Command::parse("aggregate maybe").is_err());
        assert!(Command::parse("tab map").is_err());
        assert!(Command::parse("launch").is_err());
        assert!(Command::parse("   ").is_err());
    }

    #[test]
    fn test_control_commands() {
        assert_eq!(Command::parse("quit").unwrap(), Command::Quit);
        assert_eq!(Command::parse("?").unwrap(), Command::Help);
        assert_eq!(Command::parse("reload").unwrap(), Command::Reload);
        assert_eq!(Command::parse("status").unwrap(), Command::Status);
    }
}
