//! Interactive ranking browser driven by line commands on stdin.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};

use super::build_coordinator;
use crate::config::Config;
use crate::display::TablePresenter;
use crate::error::{RankboardError, Result};
use crate::settings::{Settings, SettingsHandle};
use crate::sync::{Command, ViewportSize};
use crate::types::{RecordId, Scope, Selection};

const HELP: &str = "\
Commands:
  /<text>, search <text>   filter players (\"/\" or \"clear\" shows everyone)
  n, next / p, prev        next / previous page
  page <n>                 jump to page n
  region <id>              switch region
  global                   show the global ranking
  starred                  show only starred rows
  sort <mode>              switch sort mode
  resize <width> <height>  simulate a viewport resize
  star <id>                star or unstar a row
  help                     show this help
  q, quit                  exit";

/// A parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Region(u32),
    Scope(Scope),
    Sort(u32),
    Star(RecordId),
    Help,
    Quit,
}

fn parse_arg<T: std::str::FromStr>(arg: Option<&str>, what: &str) -> Result<T> {
    let arg = arg.ok_or_else(|| RankboardError::InvalidInput(format!("missing {what}")))?;
    arg.parse()
        .map_err(|_| RankboardError::InvalidInput(format!("invalid {what} '{arg}'")))
}

/// Parse one line typed by the user.
pub fn parse_input(line: &str) -> Result<Input> {
    let line = line.trim();
    if let Some(query) = line.strip_prefix('/') {
        return Ok(Input::Command(Command::Query(query.to_string())));
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let mut args = rest.split_whitespace();

    let input = match word.to_lowercase().as_str() {
        "" => Input::Command(Command::Refresh),
        "search" | "s" => Input::Command(Command::Query(rest.to_string())),
        "clear" => Input::Command(Command::Query(String::new())),
        "next" | "n" => Input::Command(Command::NextPage),
        "prev" | "p" => Input::Command(Command::PreviousPage),
        "page" | "g" => Input::Command(Command::Page(parse_arg(args.next(), "page")?)),
        "region" | "r" => Input::Region(parse_arg(args.next(), "region id")?),
        "global" => Input::Scope(Scope::Global),
        "starred" => Input::Scope(Scope::Starred),
        "sort" => Input::Sort(parse_arg(args.next(), "sort mode")?),
        "resize" => {
            let width = parse_arg(args.next(), "width")?;
            let height = parse_arg(args.next(), "height")?;
            Input::Command(Command::Resize(ViewportSize::new(width, height)))
        }
        "star" => Input::Star(parse_arg(args.next(), "row id")?),
        "help" | "?" => Input::Help,
        "quit" | "q" | "exit" => Input::Quit,
        other => {
            return Err(RankboardError::InvalidInput(format!(
                "unknown command '{other}' (type 'help')"
            )));
        }
    };
    Ok(input)
}

/// Forward stdin lines to the coordinator until EOF or `quit`.
async fn read_input(
    commands: UnboundedSender<Command>,
    mut selection: Selection,
    settings: SettingsHandle,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let command = match parse_input(&line) {
            Ok(Input::Command(command)) => command,
            Ok(Input::Region(region_id)) => {
                selection = selection.with_region(region_id);
                Command::Select(selection)
            }
            Ok(Input::Scope(scope)) => {
                selection = selection.with_scope(scope);
                Command::Select(selection)
            }
            Ok(Input::Sort(sort_mode)) => {
                selection = selection.with_sort(sort_mode);
                Command::Select(selection)
            }
            Ok(Input::Star(id)) => {
                let updated = settings.update(|s| s.with_star_toggled(id));
                if let Err(e) = updated.save() {
                    tracing::warn!("Failed to save settings: {e}");
                }
                tracing::info!("Toggled star for row ID {id}.");
                if selection.scope == Scope::Starred {
                    Command::Select(selection)
                } else {
                    Command::Refresh
                }
            }
            Ok(Input::Help) => {
                eprintln!("{HELP}");
                continue;
            }
            Ok(Input::Quit) => break,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        if commands.send(command).is_err() {
            break;
        }
    }
    Ok(())
}

/// Browse a ranking interactively.
pub async fn cmd_browse(selection: Option<Selection>, viewport: ViewportSize) -> Result<()> {
    let config = Config::load()?;
    let settings = SettingsHandle::new(Settings::load()?);
    let selection = selection.unwrap_or_else(|| settings.snapshot().default_selection());

    let mut coordinator = build_coordinator(&config, &settings, viewport)?;
    coordinator.select(selection);

    let (tx, rx) = mpsc::unbounded_channel();
    let input = tokio::spawn(read_input(tx, selection, settings.clone()));

    eprintln!("Type 'help' for commands.");
    let mut presenter = TablePresenter::new(std::io::stdout(), settings);
    coordinator.run(rx, &mut presenter).await;

    match input.await {
        Ok(result) => result,
        Err(e) => Err(RankboardError::Io(std::io::Error::other(e))),
    }
}
