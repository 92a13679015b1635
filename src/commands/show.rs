//! One-shot rendering of a single ranking page.

use serde_json::json;

use super::{build_coordinator, print_json};
use crate::config::Config;
use crate::display::{Presenter, TablePresenter};
use crate::error::{RankboardError, Result};
use crate::settings::{Settings, SettingsHandle};
use crate::sync::{Effect, SyncCoordinator, ViewportSize};
use crate::types::Selection;

/// Handle completions until one satisfies `done`. Returns that effect, or
/// `None` if the event channel closed first.
pub async fn wait_for<F>(coordinator: &mut SyncCoordinator, done: F) -> Option<Effect>
where
    F: Fn(Effect) -> bool,
{
    while let Some(effect) = coordinator.step().await {
        if done(effect) {
            return Some(effect);
        }
    }
    None
}

/// Options for `rankboard show`
pub struct ShowOptions {
    pub selection: Option<Selection>,
    pub query: Option<String>,
    pub page: usize,
    pub viewport: ViewportSize,
    pub json: bool,
}

/// Fetch one ranking, optionally filter it, and print the requested page.
pub async fn cmd_show(options: ShowOptions) -> Result<()> {
    let config = Config::load()?;
    let settings = SettingsHandle::new(Settings::load()?);
    let selection = options
        .selection
        .unwrap_or_else(|| settings.snapshot().default_selection());

    let mut coordinator = build_coordinator(&config, &settings, options.viewport)?;
    coordinator.select(selection);
    wait_for(&mut coordinator, |effect| {
        matches!(effect, Effect::DatasetLoaded | Effect::FetchFailed)
    })
    .await;

    if let Some(message) = coordinator.view().error_message {
        return Err(RankboardError::FetchFailure(message));
    }

    if let Some(query) = options.query.as_deref() {
        coordinator.on_query_change(query);
        wait_for(&mut coordinator, |effect| effect == Effect::ResultsReplaced).await;
    }

    coordinator.on_page_change(options.page);
    let view = coordinator.view();

    if options.json {
        print_json(&json!({
            "selection": view.selection,
            "query": view.query,
            "page": view.current_page,
            "totalPages": view.total_pages,
            "totalResults": view.total_results,
            "rowsPerPage": view.rows_per_page,
            "metadata": view.metadata,
            "rows": view.rows,
        }))
    } else {
        TablePresenter::new(std::io::stdout(), settings).render(&view);
        Ok(())
    }
}
