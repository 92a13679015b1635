//! Row-count sizing from viewport dimensions, with debounced resizes.

use serde::{Deserialize, Serialize};

use super::debounce::Debouncer;

/// Breakpoints and row metrics used to derive rows-per-page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportMetrics {
    /// Widths up to and including this value use `compact_rows`
    pub compact_max_width: u32,
    /// Widths from this value up use `wide_rows`
    pub wide_min_width: u32,
    pub compact_rows: u32,
    pub medium_rows: u32,
    pub wide_rows: u32,
    /// Height at which bonus rows start being added
    pub baseline_height: u32,
    /// Rendered height of one table row
    pub row_height: u32,
}

impl Default for ViewportMetrics {
    fn default() -> Self {
        Self {
            compact_max_width: 768,
            wide_min_width: 1536,
            compact_rows: 7,
            medium_rows: 5,
            wide_rows: 9,
            baseline_height: 600,
            row_height: 34,
        }
    }
}

impl ViewportMetrics {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Number of rows that fit a `width` x `height` viewport. Always >= 1.
    pub fn rows_per_page(&self, width: u32, height: u32) -> usize {
        let base = if width <= self.compact_max_width {
            self.compact_rows
        } else if width >= self.wide_min_width {
            self.wide_rows
        } else {
            self.medium_rows
        };

        let bonus = if height >= self.baseline_height && self.row_height > 0 {
            (height - self.baseline_height) / self.row_height
        } else {
            0
        };

        base.saturating_add(bonus).max(1) as usize
    }

    /// Height reserved for a table of `rows` rows plus its header.
    pub fn table_height(&self, rows: usize) -> u32 {
        if rows == 0 {
            return 0;
        }
        let rows = u32::try_from(rows).unwrap_or(u32::MAX);
        rows.saturating_add(1).saturating_mul(self.row_height)
    }
}

/// Width and height of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Outcome of a settled resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// Row count moved; pagination must restart at page 1
    Changed { before: usize, after: usize },
    Unchanged,
    /// The event came from a superseded timer
    Stale,
}

/// Owns `rows_per_page` and the resize debounce channel.
#[derive(Debug)]
pub struct ViewportSizer {
    metrics: ViewportMetrics,
    rows_per_page: usize,
    latest: ViewportSize,
    debounce: Debouncer,
}

impl ViewportSizer {
    pub fn new(metrics: ViewportMetrics, initial: ViewportSize, debounce: Debouncer) -> Self {
        Self {
            rows_per_page: metrics.rows_per_page(initial.width, initial.height),
            metrics,
            latest: initial,
            debounce,
        }
    }

    pub fn compute_rows_per_page(&self, width: u32, height: u32) -> usize {
        self.metrics.rows_per_page(width, height)
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    pub fn table_height(&self) -> u32 {
        self.metrics.table_height(self.rows_per_page)
    }

    pub fn metrics(&self) -> &ViewportMetrics {
        &self.metrics
    }

    /// Record new dimensions. Recomputation waits for the debounce timer, so
    /// only the final size of a burst of resizes is ever used.
    pub fn record(&mut self, size: ViewportSize) {
        self.latest = size;
    }

    pub fn debouncer(&mut self) -> &mut Debouncer {
        &mut self.debounce
    }

    /// Apply the settled dimensions when the resize timer `seq` fires.
    pub fn settle(&mut self, seq: u64) -> ResizeOutcome {
        if !self.debounce.accept(seq) {
            return ResizeOutcome::Stale;
        }

        let before = self.rows_per_page;
        let after = self.compute_rows_per_page(self.latest.width, self.latest.height);
        if before == after {
            return ResizeOutcome::Unchanged;
        }
        self.rows_per_page = after;
        ResizeOutcome::Changed { before, after }
    }
}
