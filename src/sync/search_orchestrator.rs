//! Debounced search over the canonical dataset.
//!
//! Query changes arm a quiescence timer instead of searching right away. When
//! the timer fires the search runs against the canonical dataset, and only the
//! most recently fired invocation may replace the result buffer.

use std::sync::Arc;

use futures::future::BoxFuture;

use super::debounce::Debouncer;
use crate::search::{SearchError, SearchPrimitive, invoke};
use crate::types::{Dataset, RankingRecord};

/// A search ready to run off the event loop.
pub struct SearchJob {
    pub seq: u64,
    pub query: String,
    pub future: BoxFuture<'static, Result<Vec<RankingRecord>, SearchError>>,
}

/// What a fired search timer asks of the caller.
pub enum FireOutcome {
    /// Run this job and report back through `complete`
    Run(SearchJob),
    /// Empty query: the canonical dataset was applied directly
    ShowAll,
    /// Superseded by a newer query or dataset
    Stale,
}

/// What a completed invocation did to the result buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchApplied {
    /// Buffer replaced; the page must restart at 1
    Replaced,
    /// Superseded by a newer query or dataset
    Stale,
}

pub struct SearchOrchestrator {
    primitive: Arc<dyn SearchPrimitive>,
    query: String,
    results: Dataset,
    debounce: Debouncer,
    /// Sequence of the latest invocation handed out by `fire`
    fired: u64,
    in_flight: bool,
}

impl SearchOrchestrator {
    pub fn new(primitive: Arc<dyn SearchPrimitive>, debounce: Debouncer) -> Self {
        Self {
            primitive,
            query: String::new(),
            results: crate::types::empty_dataset(),
            debounce,
            fired: 0,
            in_flight: false,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn current_results(&self) -> Dataset {
        self.results.clone()
    }

    /// True while a timer is armed or an invocation has not reported back.
    pub fn is_searching(&self) -> bool {
        self.debounce.is_pending() || self.in_flight
    }

    /// Record the new query text. The caller arms the timer through
    /// [`SearchOrchestrator::debouncer`], which cancels any pending one.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn debouncer(&mut self) -> &mut Debouncer {
        &mut self.debounce
    }

    /// Handle the timer `seq` firing.
    ///
    /// An empty query shows `canonical` directly without touching the
    /// primitive. Otherwise a [`SearchJob`] is returned for the caller to run.
    pub fn fire(&mut self, seq: u64, canonical: Dataset) -> FireOutcome {
        if !self.debounce.accept(seq) {
            return FireOutcome::Stale;
        }

        self.fired = seq;
        let query = self.query.trim().to_string();
        if query.is_empty() {
            self.in_flight = false;
            self.results = canonical;
            return FireOutcome::ShowAll;
        }

        self.in_flight = true;
        let future = Box::pin(invoke(self.primitive.clone(), canonical, query.clone()));
        FireOutcome::Run(SearchJob { seq, query, future })
    }

    /// Apply the outcome of invocation `seq`. Failures become an empty result.
    pub fn complete(
        &mut self,
        seq: u64,
        outcome: Result<Vec<RankingRecord>, SearchError>,
    ) -> SearchApplied {
        // A newer query may be scheduled without having fired yet.
        if seq != self.fired || seq != self.debounce.current_seq() || !self.in_flight {
            return SearchApplied::Stale;
        }
        self.in_flight = false;

        self.results = match outcome {
            Ok(records) => Arc::from(records),
            Err(e) => {
                tracing::warn!("Search failed, showing no matches: {e}");
                crate::types::empty_dataset()
            }
        };
        SearchApplied::Replaced
    }

    /// Return to the "show everything" baseline for a freshly loaded dataset.
    ///
    /// Pending timers are cancelled and in-flight invocations are invalidated
    /// since they were computed against the previous dataset.
    pub fn reset_to(&mut self, canonical: Dataset) {
        self.debounce.invalidate();
        self.fired = self.debounce.current_seq();
        self.in_flight = false;
        self.query.clear();
        self.results = canonical;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::FuzzySearch;
    use crate::types::make_record;
    use std::time::Duration;

    fn dataset(names: &[&str]) -> Dataset {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| make_record(i as u32 + 1, name))
            .collect::<Vec<_>>()
            .into()
    }

    fn orchestrator() -> SearchOrchestrator {
        SearchOrchestrator::new(
            Arc::new(FuzzySearch::new()),
            Debouncer::new(Duration::from_millis(250)),
        )
    }

    fn job(outcome: FireOutcome) -> SearchJob {
        match outcome {
            FireOutcome::Run(job) => job,
            FireOutcome::ShowAll => panic!("expected a job, got ShowAll"),
            FireOutcome::Stale => panic!("expected a job, got Stale"),
        }
    }

    fn arm(orch: &mut SearchOrchestrator, query: &str) -> u64 {
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel::<u64>();
        orch.set_query(query);
        orch.debouncer().schedule(&tx, |seq| seq)
    }

    #[tokio::test]
    async fn test_empty_query_short_circuits() {
        let mut orch = orchestrator();
        let data = dataset(&["alice", "bob"]);
        let seq = arm(&mut orch, "");

        let fired = orch.fire(seq, data.clone());
        assert!(matches!(fired, FireOutcome::ShowAll));
        assert_eq!(orch.current_results().len(), 2);
    }

    #[tokio::test]
    async fn test_non_empty_query_runs_job() {
        let mut orch = orchestrator();
        let data = dataset(&["alice", "bob"]);
        let seq = arm(&mut orch, "bob");

        let job = job(orch.fire(seq, data));
        assert_eq!(job.query, "bob");
        assert!(orch.is_searching());

        let outcome = job.future.await;
        assert_eq!(orch.complete(job.seq, outcome), SearchApplied::Replaced);
        assert_eq!(orch.current_results()[0].display_name, "bob");
        assert!(!orch.is_searching());
    }

    #[tokio::test]
    async fn test_superseded_timer_is_stale() {
        let mut orch = orchestrator();
        let first = arm(&mut orch, "al");
        let second = arm(&mut orch, "alice");

        assert!(matches!(
            orch.fire(first, dataset(&["alice"])),
            FireOutcome::Stale
        ));
        assert!(matches!(
            orch.fire(second, dataset(&["alice"])),
            FireOutcome::Run(_)
        ));
    }

    #[tokio::test]
    async fn test_late_invocation_never_overwrites_newer() {
        let mut orch = orchestrator();
        let data = dataset(&["alice", "bob"]);

        let first = arm(&mut orch, "alice");
        let first_job = job(orch.fire(first, data.clone()));
        let second = arm(&mut orch, "bob");
        let second_job = job(orch.fire(second, data));

        let second_outcome = second_job.future.await;
        assert_eq!(orch.complete(second, second_outcome), SearchApplied::Replaced);

        let first_outcome = first_job.future.await;
        assert_eq!(orch.complete(first, first_outcome), SearchApplied::Stale);
        assert_eq!(orch.current_results()[0].display_name, "bob");
    }

    #[tokio::test]
    async fn test_result_is_stale_once_newer_query_is_scheduled() {
        let mut orch = orchestrator();
        let data = dataset(&["alice", "bob"]);

        let first = arm(&mut orch, "alice");
        let first_job = job(orch.fire(first, data));
        arm(&mut orch, "bob");

        let outcome = first_job.future.await;
        assert_eq!(orch.complete(first, outcome), SearchApplied::Stale);
        assert!(orch.current_results().is_empty());
        assert_eq!(orch.query(), "bob");
        assert!(orch.is_searching());
    }

    #[tokio::test]
    async fn test_failure_becomes_empty_results() {
        let mut orch = orchestrator();
        let seq = arm(&mut orch, "alice");
        let _job = job(orch.fire(seq, dataset(&["alice"])));

        let applied = orch.complete(seq, Err(SearchError::NotReady));
        assert_eq!(applied, SearchApplied::Replaced);
        assert!(orch.current_results().is_empty());
    }

    #[tokio::test]
    async fn test_reset_invalidates_in_flight() {
        let mut orch = orchestrator();
        let seq = arm(&mut orch, "alice");
        let job = job(orch.fire(seq, dataset(&["alice"])));

        orch.reset_to(dataset(&["x", "y", "z"]));
        let outcome = job.future.await;

        assert_eq!(orch.complete(seq, outcome), SearchApplied::Stale);
        assert_eq!(orch.current_results().len(), 3);
        assert_eq!(orch.query(), "");
    }
}
