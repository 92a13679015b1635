use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use rankboard::commands::{
    ShowOptions, cmd_browse, cmd_config_path, cmd_config_set, cmd_config_show, cmd_default,
    cmd_show, cmd_star, cmd_theme,
};
use rankboard::{RankboardError, Selection, Theme, ViewportSize};

#[derive(Parser)]
#[command(name = "rankboard")]
#[command(about = "Searchable, paginated ranking tables")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Region and sort mode; falls back to the saved defaults
#[derive(Args)]
struct SelectionArgs {
    /// Region ID
    #[arg(short, long, conflicts_with_all = ["global", "starred"])]
    region: Option<u32>,

    /// Sort mode
    #[arg(short, long)]
    sort: Option<u32>,

    /// Show the global ranking
    #[arg(long, conflicts_with = "starred")]
    global: bool,

    /// Show only starred rows
    #[arg(long)]
    starred: bool,
}

impl SelectionArgs {
    fn resolve(&self) -> Option<Selection> {
        if self.region.is_none() && self.sort.is_none() && !self.global && !self.starred {
            return None;
        }
        let defaults = rankboard::Settings::load()
            .map(|s| s.default_selection())
            .unwrap_or_default();
        let sort_mode = self.sort.unwrap_or(defaults.sort_mode);

        let selection = if self.global {
            Selection::global(sort_mode)
        } else if self.starred {
            Selection::starred(sort_mode)
        } else if let Some(region_id) = self.region {
            Selection::new(region_id, sort_mode)
        } else {
            defaults.with_sort(sort_mode)
        };
        Some(selection)
    }
}

/// Viewport used to size pages
#[derive(Args)]
struct ViewportArgs {
    /// Viewport width
    #[arg(long, default_value = "1920")]
    width: u32,

    /// Viewport height
    #[arg(long, default_value = "700")]
    height: u32,
}

impl ViewportArgs {
    fn size(&self) -> ViewportSize {
        ViewportSize::new(self.width, self.height)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Browse a ranking interactively
    #[command(visible_alias = "b")]
    Browse {
        #[command(flatten)]
        selection: SelectionArgs,

        #[command(flatten)]
        viewport: ViewportArgs,
    },

    /// Print one page of a ranking
    Show {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Filter players by name
        #[arg(short, long)]
        query: Option<String>,

        /// Page to print
        #[arg(short, long, default_value = "1")]
        page: usize,

        #[command(flatten)]
        viewport: ViewportArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Star or unstar a row by ID
    Star {
        /// Row ID
        id: u64,
    },

    /// Save the default region and sort mode
    Default {
        /// Region ID
        region: u32,

        /// Sort mode
        #[arg(default_value = "0")]
        sort: u32,
    },

    /// Set the output theme: colored or plain
    Theme {
        #[arg(value_parser = parse_theme)]
        theme: Theme,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Print the config file path
    Path,
    /// Set a configuration value
    Set {
        /// Key, e.g. api_url or viewport.row_height
        key: String,
        /// Value
        value: String,
    },
}

fn parse_theme(s: &str) -> Result<Theme, RankboardError> {
    match s.to_lowercase().as_str() {
        "colored" | "color" => Ok(Theme::Colored),
        "plain" => Ok(Theme::Plain),
        _ => Err(RankboardError::InvalidInput(format!(
            "invalid theme '{s}', expected colored or plain"
        ))),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Browse {
            selection,
            viewport,
        } => cmd_browse(selection.resolve(), viewport.size()).await,
        Commands::Show {
            selection,
            query,
            page,
            viewport,
            json,
        } => {
            cmd_show(ShowOptions {
                selection: selection.resolve(),
                query,
                page,
                viewport: viewport.size(),
                json,
            })
            .await
        }
        Commands::Star { id } => cmd_star(id),
        Commands::Default { region, sort } => cmd_default(Selection::new(region, sort)),
        Commands::Theme { theme } => cmd_theme(theme),
        Commands::Config { action } => match action {
            ConfigAction::Show => cmd_config_show(),
            ConfigAction::Path => cmd_config_path(),
            ConfigAction::Set { key, value } => cmd_config_set(&key, &value),
        },
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
