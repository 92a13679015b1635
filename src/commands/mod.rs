mod browse;
mod config;
mod prefs;
mod show;

pub use browse::{Input, cmd_browse, parse_input};
pub use config::{cmd_config_path, cmd_config_set, cmd_config_show};
pub use prefs::{cmd_default, cmd_star, cmd_theme};
pub use show::{ShowOptions, cmd_show, wait_for};

use std::sync::Arc;

use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::scores::HttpScoreSource;
use crate::search::FuzzySearch;
use crate::settings::SettingsHandle;
use crate::sync::{SyncCoordinator, SyncOptions, ViewportSize};

/// Coordinator wired to the HTTP scores API and the fuzzy search primitive.
/// Starred selections read their ids from `settings`.
pub fn build_coordinator(
    config: &Config,
    settings: &SettingsHandle,
    viewport: ViewportSize,
) -> Result<SyncCoordinator> {
    let source = Arc::new(HttpScoreSource::from_config(config)?.with_starred(settings.clone()));
    Ok(SyncCoordinator::new(
        source,
        Arc::new(FuzzySearch::new()),
        SyncOptions::from_config(config, viewport),
    ))
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
