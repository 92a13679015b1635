//! Search primitives: opaque text filters over a ranking dataset.
//!
//! A primitive receives the structured dataset and a query and answers with
//! serialized JSON matches. Everything that can go wrong on that boundary is
//! reported as a [`SearchError`] so callers can degrade to "no matches".

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::types::{Dataset, RankingRecord};

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("search primitive is not ready")]
    NotReady,

    #[error("search primitive failed: {0}")]
    Internal(String),

    #[error("search output could not be parsed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A text-query filter over a ranking dataset.
#[async_trait]
pub trait SearchPrimitive: Send + Sync {
    /// Return matching records serialized as a JSON array of records.
    async fn search(&self, dataset: Dataset, query: &str) -> Result<String, SearchError>;
}

/// Parse primitive output back into records.
pub fn parse_matches(serialized: &str) -> Result<Vec<RankingRecord>, SearchError> {
    Ok(serde_json::from_str(serialized)?)
}

/// Invoke `primitive` and parse its answer. A panicking primitive is reported
/// as [`SearchError::Internal`].
pub async fn invoke(
    primitive: Arc<dyn SearchPrimitive>,
    dataset: Dataset,
    query: String,
) -> Result<Vec<RankingRecord>, SearchError> {
    let call = async move { primitive.search(dataset, &query).await };
    match AssertUnwindSafe(call).catch_unwind().await {
        Ok(result) => parse_matches(&result?),
        Err(panic) => {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panicked".to_string());
            Err(SearchError::Internal(reason))
        }
    }
}

/// Fuzzy matcher over display names.
///
/// The matcher is built on first use. Smart case: case-insensitive unless the
/// query contains uppercase. Names containing the query as a substring come
/// first, then names that only contain its characters in order. Within each
/// group results are ordered best match first; equal scores keep dataset order.
#[derive(Default)]
pub struct FuzzySearch {
    matcher: OnceCell<SkimMatcherV2>,
}

impl FuzzySearch {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SearchPrimitive for FuzzySearch {
    async fn search(&self, dataset: Dataset, query: &str) -> Result<String, SearchError> {
        let matcher = self
            .matcher
            .get_or_init(|| async { SkimMatcherV2::default().smart_case() })
            .await;

        let case_sensitive = query.chars().any(char::is_uppercase);
        let needle = if case_sensitive {
            query.to_string()
        } else {
            query.to_lowercase()
        };

        let mut scored: Vec<(bool, i64, &RankingRecord)> = dataset
            .iter()
            .filter_map(|record| {
                let score = matcher.fuzzy_match(&record.display_name, query)?;
                let exact = if case_sensitive {
                    record.display_name.contains(&needle)
                } else {
                    record.display_name.to_lowercase().contains(&needle)
                };
                Some((exact, score, record))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));

        let matches: Vec<&RankingRecord> =
            scored.into_iter().map(|(_, _, record)| record).collect();
        Ok(serde_json::to_string(&matches)?)
    }
}
