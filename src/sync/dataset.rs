//! Canonical ranking dataset for the current selection.

use std::sync::Arc;

use crate::types::{Dataset, ScoreMetadata, ScorePage, Selection, empty_dataset};

/// Fetch lifecycle as observed by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Ready,
    /// Terminal until the next selection change
    Failed(String),
}

/// Receipt for an issued fetch. Only the latest ticket may be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub selection: Selection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Ready,
    Failed,
    /// A newer fetch was issued after this one
    Stale,
}

/// Holds the canonical dataset. Replaced wholesale on every successful fetch,
/// left untouched on failure.
#[derive(Debug)]
pub struct DatasetStore {
    dataset: Dataset,
    metadata: ScoreMetadata,
    state: FetchState,
    selection: Option<Selection>,
    issued: u64,
}

impl Default for DatasetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetStore {
    pub fn new() -> Self {
        Self {
            dataset: empty_dataset(),
            metadata: ScoreMetadata::default(),
            state: FetchState::Idle,
            selection: None,
            issued: 0,
        }
    }

    /// Issue a fetch for `selection`, superseding any fetch still in flight.
    pub fn begin(&mut self, selection: Selection) -> FetchTicket {
        self.issued += 1;
        self.selection = Some(selection);
        self.state = FetchState::Loading;
        FetchTicket {
            seq: self.issued,
            selection,
        }
    }

    /// Apply the outcome of `seq`. Outcomes of superseded fetches are dropped.
    pub fn complete(&mut self, seq: u64, outcome: Result<ScorePage, String>) -> Applied {
        if seq != self.issued {
            return Applied::Stale;
        }
        match outcome {
            Ok(page) => {
                self.dataset = Arc::from(page.records);
                self.metadata = page.metadata;
                self.state = FetchState::Ready;
                Applied::Ready
            }
            Err(message) => {
                self.state = FetchState::Failed(message);
                Applied::Failed
            }
        }
    }

    pub fn dataset(&self) -> Dataset {
        self.dataset.clone()
    }

    pub fn metadata(&self) -> ScoreMetadata {
        self.metadata
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == FetchState::Loading
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            FetchState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Selection of the most recently issued fetch.
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }
}
