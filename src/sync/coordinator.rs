//! Top-level controller keeping fetch, search, viewport and paging in step.
//!
//! All state lives on the task that owns the coordinator. Fetches, search
//! invocations and debounce timers run as spawned tasks and report back over a
//! single event channel, so every mutation happens in the order events are
//! handled. Stale events are recognized by sequence number and dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::dataset::{Applied, DatasetStore};
use super::debounce::Debouncer;
use super::pagination::PaginationController;
use super::search_orchestrator::{FireOutcome, SearchApplied, SearchOrchestrator};
use super::viewport::{ResizeOutcome, ViewportMetrics, ViewportSize, ViewportSizer};
use crate::config::Config;
use crate::display::Presenter;
use crate::scores::ScoreSource;
use crate::search::{SearchError, SearchPrimitive};
use crate::types::{RankingRecord, ScoreMetadata, ScorePage, Selection};

/// Input from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Select(Selection),
    Query(String),
    Resize(ViewportSize),
    Page(usize),
    NextPage,
    PreviousPage,
    /// Re-render without changing state
    Refresh,
}

/// Completion reported by a spawned task.
#[derive(Debug)]
pub enum SyncEvent {
    FetchCompleted {
        seq: u64,
        selection: Selection,
        outcome: Result<ScorePage, String>,
    },
    SearchTimerFired {
        seq: u64,
    },
    SearchCompleted {
        seq: u64,
        outcome: Result<Vec<RankingRecord>, SearchError>,
    },
    ResizeTimerFired {
        seq: u64,
    },
}

/// What handling an event did to the visible state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// New canonical dataset shown unfiltered from page 1
    DatasetLoaded,
    FetchFailed,
    /// Search timer fired and the primitive is running
    SearchStarted,
    /// Filtered results replaced, page reset to 1
    ResultsReplaced,
    /// Rows per page changed, page reset to 1
    RowsChanged,
    /// Settled resize kept the same row count
    Unchanged,
    /// Result of a superseded fetch, timer or search
    Discarded,
}

/// Everything the presentation layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub rows: Vec<RankingRecord>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_results: usize,
    pub rows_per_page: usize,
    pub table_height: u32,
    pub loading: bool,
    pub searching: bool,
    pub error_message: Option<String>,
    pub query: String,
    pub metadata: ScoreMetadata,
    pub selection: Option<Selection>,
}

/// Timing and sizing knobs for a coordinator.
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    pub search_debounce: Duration,
    pub resize_debounce: Duration,
    pub metrics: ViewportMetrics,
    pub viewport: ViewportSize,
}

impl SyncOptions {
    pub fn from_config(config: &Config, viewport: ViewportSize) -> Self {
        Self {
            search_debounce: config.search_debounce(),
            resize_debounce: config.resize_debounce(),
            metrics: config.viewport,
            viewport,
        }
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self::from_config(&Config::default(), ViewportSize::new(1920, 1080))
    }
}

pub struct SyncCoordinator {
    source: Arc<dyn ScoreSource>,
    dataset: DatasetStore,
    search: SearchOrchestrator,
    viewport: ViewportSizer,
    pagination: PaginationController,
    events_tx: UnboundedSender<SyncEvent>,
    events_rx: UnboundedReceiver<SyncEvent>,
}

impl SyncCoordinator {
    pub fn new(
        source: Arc<dyn ScoreSource>,
        primitive: Arc<dyn SearchPrimitive>,
        options: SyncOptions,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let viewport = ViewportSizer::new(
            options.metrics,
            options.viewport,
            Debouncer::new(options.resize_debounce),
        );
        let pagination = PaginationController::new(viewport.rows_per_page());

        Self {
            source,
            dataset: DatasetStore::new(),
            search: SearchOrchestrator::new(primitive, Debouncer::new(options.search_debounce)),
            viewport,
            pagination,
            events_tx,
            events_rx,
        }
    }

    /// Start loading the dataset for `selection`.
    ///
    /// Any fetch still in flight keeps running but its result will be dropped.
    pub fn select(&mut self, selection: Selection) {
        let ticket = self.dataset.begin(selection);
        tracing::info!("Fetching ranking data for {selection}...");

        let source = self.source.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = source
                .fetch_scores(ticket.selection)
                .await
                .map_err(|e| e.display_message());
            let _ = tx.send(SyncEvent::FetchCompleted {
                seq: ticket.seq,
                selection: ticket.selection,
                outcome,
            });
        });
    }

    /// Record new query text and restart the search quiescence timer.
    pub fn on_query_change(&mut self, query: &str) {
        self.search.set_query(query);
        self.search
            .debouncer()
            .schedule(&self.events_tx, |seq| SyncEvent::SearchTimerFired { seq });
    }

    /// Record new viewport dimensions and restart the resize timer.
    pub fn on_resize(&mut self, size: ViewportSize) {
        self.viewport.record(size);
        self.viewport
            .debouncer()
            .schedule(&self.events_tx, |seq| SyncEvent::ResizeTimerFired { seq });
    }

    /// Navigate to `page`, clamped into range. Returns the page shown.
    pub fn on_page_change(&mut self, page: usize) -> usize {
        self.pagination.set_page(page)
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Select(selection) => self.select(selection),
            Command::Query(query) => self.on_query_change(&query),
            Command::Resize(size) => self.on_resize(size),
            Command::Page(page) => {
                self.on_page_change(page);
            }
            Command::NextPage => {
                self.on_page_change(self.pagination.current_page() + 1);
            }
            Command::PreviousPage => {
                self.on_page_change(self.pagination.current_page().saturating_sub(1));
            }
            Command::Refresh => {}
        }
    }

    pub fn handle_event(&mut self, event: SyncEvent) -> Effect {
        match event {
            SyncEvent::FetchCompleted {
                seq,
                selection,
                outcome,
            } => self.handle_fetch(seq, selection, outcome),
            SyncEvent::SearchTimerFired { seq } => self.handle_search_timer(seq),
            SyncEvent::SearchCompleted { seq, outcome } => match self.search.complete(seq, outcome)
            {
                SearchApplied::Replaced => {
                    self.restart_paging();
                    Effect::ResultsReplaced
                }
                SearchApplied::Stale => {
                    tracing::debug!("Discarding result of superseded search #{seq}");
                    Effect::Discarded
                }
            },
            SyncEvent::ResizeTimerFired { seq } => self.handle_resize_timer(seq),
        }
    }

    fn handle_fetch(
        &mut self,
        seq: u64,
        selection: Selection,
        outcome: Result<ScorePage, String>,
    ) -> Effect {
        match self.dataset.complete(seq, outcome) {
            Applied::Ready => {
                tracing::info!(
                    "Fetch ranking for {selection} succeeded ({} records).",
                    self.dataset.dataset().len()
                );
                self.search.reset_to(self.dataset.dataset());
                self.restart_paging();
                Effect::DatasetLoaded
            }
            Applied::Failed => {
                tracing::error!(
                    "Fetch ranking for {selection} failed: {}",
                    self.dataset.error_message().unwrap_or_default()
                );
                Effect::FetchFailed
            }
            Applied::Stale => {
                tracing::debug!("Discarding superseded fetch #{seq} for {selection}");
                Effect::Discarded
            }
        }
    }

    fn handle_search_timer(&mut self, seq: u64) -> Effect {
        match self.search.fire(seq, self.dataset.dataset()) {
            FireOutcome::Run(job) => {
                tracing::info!("Search debounce elapsed. Searching for {:?}...", job.query);
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let outcome = job.future.await;
                    let _ = tx.send(SyncEvent::SearchCompleted {
                        seq: job.seq,
                        outcome,
                    });
                });
                Effect::SearchStarted
            }
            FireOutcome::ShowAll => {
                tracing::info!("Search debounce elapsed. Query empty, showing all rows.");
                self.restart_paging();
                Effect::ResultsReplaced
            }
            FireOutcome::Stale => Effect::Discarded,
        }
    }

    fn handle_resize_timer(&mut self, seq: u64) -> Effect {
        match self.viewport.settle(seq) {
            ResizeOutcome::Changed { before, after } => {
                tracing::info!("Resize debounce elapsed. Rows per page {before} -> {after}.");
                self.restart_paging();
                Effect::RowsChanged
            }
            ResizeOutcome::Unchanged => Effect::Unchanged,
            ResizeOutcome::Stale => Effect::Discarded,
        }
    }

    fn restart_paging(&mut self) {
        self.pagination.reset();
        self.sync_bounds();
    }

    fn sync_bounds(&mut self) {
        self.pagination.update_bounds(
            self.search.current_results().len(),
            self.viewport.rows_per_page(),
        );
    }

    /// Wait for the next completion and handle it.
    pub async fn step(&mut self) -> Option<Effect> {
        let event = self.events_rx.recv().await?;
        Some(self.handle_event(event))
    }

    /// Handle every completion already queued without waiting.
    pub fn drain(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            effects.push(self.handle_event(event));
        }
        effects
    }

    pub fn view(&self) -> ViewState {
        let results = self.search.current_results();
        ViewState {
            rows: self.pagination.slice(&results).to_vec(),
            current_page: self.pagination.current_page(),
            total_pages: self.pagination.total_pages(),
            total_results: results.len(),
            rows_per_page: self.pagination.rows_per_page(),
            table_height: self.viewport.table_height(),
            loading: self.dataset.is_loading(),
            searching: self.search.is_searching(),
            error_message: self.dataset.error_message().map(str::to_string),
            query: self.search.query().to_string(),
            metadata: self.dataset.metadata(),
            selection: self.dataset.selection(),
        }
    }

    /// Drive the coordinator until `commands` closes, rendering after every
    /// command and every handled event.
    pub async fn run<P: Presenter>(
        mut self,
        mut commands: UnboundedReceiver<Command>,
        presenter: &mut P,
    ) {
        presenter.render(&self.view());
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.apply(command),
                    None => break,
                },
                Some(event) = self.events_rx.recv() => {
                    self.handle_event(event);
                }
            }
            presenter.render(&self.view());
        }
    }
}
