#![allow(dead_code)]

use std::collections::HashMap;
use std::process::{Command, Output};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tempfile::TempDir;

use rankboard::error::{RankboardError, Result};
use rankboard::search::SearchPrimitive;
use rankboard::types::Dataset;
use rankboard::{
    FuzzySearch, RankingRecord, ScoreMetadata, ScorePage, ScoreSource, SearchError, Selection,
    SyncCoordinator, SyncOptions, ViewportMetrics, ViewportSize,
};

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(250);
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(200);

/// 1920x600 fits exactly nine rows with the default metrics
pub const NINE_ROWS: ViewportSize = ViewportSize {
    width: 1920,
    height: 600,
};

pub fn record(rank: u32, name: &str) -> RankingRecord {
    RankingRecord {
        id: u64::from(rank) * 100,
        rank,
        display_name: name.to_string(),
        score_value: 1_000_000 - i64::from(rank),
        pp_value: 0.0,
        delta: 0.0,
    }
}

/// `count` records named `player1..playerN`
pub fn players(count: u32) -> Vec<RankingRecord> {
    (1..=count).map(|n| record(n, &format!("player{n}"))).collect()
}

pub fn page(records: Vec<RankingRecord>) -> ScorePage {
    ScorePage {
        records,
        metadata: ScoreMetadata {
            recently_inactive: 2,
            total_inactives: 10,
        },
    }
}

struct Region {
    delay: Duration,
    outcome: std::result::Result<Vec<RankingRecord>, String>,
}

/// Score source answering from canned regions after a per-region delay.
#[derive(Default)]
pub struct MockSource {
    regions: HashMap<u32, Region>,
    fetches: AtomicUsize,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(mut self, id: u32, delay: Duration, records: Vec<RankingRecord>) -> Self {
        self.regions.insert(
            id,
            Region {
                delay,
                outcome: Ok(records),
            },
        );
        self
    }

    pub fn failing(mut self, id: u32, delay: Duration, message: &str) -> Self {
        self.regions.insert(
            id,
            Region {
                delay,
                outcome: Err(message.to_string()),
            },
        );
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScoreSource for MockSource {
    async fn fetch_scores(&self, selection: Selection) -> Result<ScorePage> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let region = self.regions.get(&selection.region_id).ok_or_else(|| {
            RankboardError::FetchFailure("Request failed with status code 404".to_string())
        })?;
        tokio::time::sleep(region.delay).await;
        match &region.outcome {
            Ok(records) => Ok(page(records.clone())),
            Err(message) => Err(RankboardError::FetchFailure(message.clone())),
        }
    }
}

/// Fuzzy search that records every query and can be slowed down per query.
#[derive(Default)]
pub struct RecordingSearch {
    inner: FuzzySearch,
    queries: Mutex<Vec<String>>,
    delays: Mutex<HashMap<String, Duration>>,
}

impl RecordingSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slow(self, query: &str, delay: Duration) -> Self {
        self.delays.lock().insert(query.to_string(), delay);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl SearchPrimitive for RecordingSearch {
    async fn search(
        &self,
        dataset: Dataset,
        query: &str,
    ) -> std::result::Result<String, SearchError> {
        self.queries.lock().push(query.to_string());
        let delay = self.delays.lock().get(query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.search(dataset, query).await
    }
}

/// Primitive that always fails.
pub struct BrokenSearch;

#[async_trait]
impl SearchPrimitive for BrokenSearch {
    async fn search(
        &self,
        _dataset: Dataset,
        _query: &str,
    ) -> std::result::Result<String, SearchError> {
        panic!("search index corrupted")
    }
}

pub fn options(viewport: ViewportSize) -> SyncOptions {
    SyncOptions {
        search_debounce: SEARCH_DEBOUNCE,
        resize_debounce: RESIZE_DEBOUNCE,
        metrics: ViewportMetrics::default(),
        viewport,
    }
}

pub fn coordinator(
    source: Arc<dyn ScoreSource>,
    primitive: Arc<dyn SearchPrimitive>,
    viewport: ViewportSize,
) -> SyncCoordinator {
    SyncCoordinator::new(source, primitive, options(viewport))
}

/// Helper to run rankboard commands against an isolated config directory
pub struct RankboardTest {
    pub config_dir: TempDir,
    binary_path: &'static str,
}

impl RankboardTest {
    pub fn new() -> Self {
        let config_dir = TempDir::new().expect("Failed to create temp directory");
        RankboardTest {
            config_dir,
            binary_path: env!("CARGO_BIN_EXE_rankboard"),
        }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(self.binary_path)
            .args(args)
            .env("RANKBOARD_CONFIG_DIR", self.config_dir.path())
            .env_remove("RANKBOARD_API_URL")
            .output()
            .expect("Failed to execute rankboard command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Command {:?} should have failed\nstdout: {}",
            args,
            String::from_utf8_lossy(&output.stdout)
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.config_dir.path().join(name))
            .unwrap_or_else(|e| panic!("Failed to read {name}: {e}"))
    }
}
