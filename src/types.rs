use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identifier of a ranking row as assigned by the scores backend.
pub type RecordId = u64;

/// One normalized row of a ranking table.
///
/// The camelCase serialization is also the format exchanged with search
/// primitives, so a primitive may hand back any structurally compatible JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingRecord {
    pub id: RecordId,
    /// 1-based position in the backend response
    pub rank: u32,
    pub display_name: String,
    pub score_value: i64,
    #[serde(default)]
    pub pp_value: f64,
    #[serde(default)]
    pub delta: f64,
}

/// Shared, immutable snapshot of a list of records.
pub type Dataset = Arc<[RankingRecord]>;

/// Build an empty dataset.
pub fn empty_dataset() -> Dataset {
    Arc::from(Vec::<RankingRecord>::new())
}

/// Which ranking a selection refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// One region's ranking; uses `region_id`
    #[default]
    Country,
    Global,
    /// Only the starred rows, resolved when the fetch is issued
    Starred,
}

/// Which dataset is canonical: a region and the sort mode applied to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Selection {
    pub region_id: u32,
    pub sort_mode: u32,
    #[serde(default)]
    pub scope: Scope,
}

impl Selection {
    pub fn new(region_id: u32, sort_mode: u32) -> Self {
        Self {
            region_id,
            sort_mode,
            scope: Scope::Country,
        }
    }

    pub fn global(sort_mode: u32) -> Self {
        Self {
            scope: Scope::Global,
            ..Self::new(0, sort_mode)
        }
    }

    pub fn starred(sort_mode: u32) -> Self {
        Self {
            scope: Scope::Starred,
            ..Self::new(0, sort_mode)
        }
    }

    /// Switch to a region's ranking, leaving global or starred mode.
    pub fn with_region(self, region_id: u32) -> Self {
        Self {
            region_id,
            scope: Scope::Country,
            ..self
        }
    }

    pub fn with_sort(self, sort_mode: u32) -> Self {
        Self { sort_mode, ..self }
    }

    pub fn with_scope(self, scope: Scope) -> Self {
        Self { scope, ..self }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            Scope::Country => write!(f, "region {} (sort {})", self.region_id, self.sort_mode),
            Scope::Global => write!(f, "global (sort {})", self.sort_mode),
            Scope::Starred => write!(f, "starred (sort {})", self.sort_mode),
        }
    }
}

/// Aggregate figures delivered alongside a ranking, carried unchanged to
/// presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreMetadata {
    pub recently_inactive: u64,
    pub total_inactives: u64,
}

/// A successfully fetched and normalized ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct ScorePage {
    pub records: Vec<RankingRecord>,
    pub metadata: ScoreMetadata,
}

#[cfg(test)]
pub(crate) fn make_record(rank: u32, name: &str) -> RankingRecord {
    RankingRecord {
        id: u64::from(rank) * 100,
        rank,
        display_name: name.to_string(),
        score_value: 1_000_000 - i64::from(rank),
        pp_value: 0.0,
        delta: 0.0,
    }
}
