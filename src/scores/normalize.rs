//! Normalization of raw API rows into [`RankingRecord`]s.

use serde::Deserialize;

use crate::types::{RankingRecord, RecordId, ScoreMetadata, ScorePage};

/// Response envelope: either `data` or a `message` explaining its absence.
#[derive(Debug, Deserialize)]
pub struct ScoresResponse {
    #[serde(default)]
    pub data: Option<ScoresData>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoresData {
    #[serde(default)]
    pub rankings: Vec<RawRanking>,
    #[serde(default)]
    pub inactives: Inactives,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inactives {
    #[serde(default)]
    pub recently_inactive: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRanking {
    pub score_id: RecordId,
    pub user: RawUser,
    #[serde(default = "missing_score")]
    pub score: RawScore,
    #[serde(default)]
    pub pp: f64,
    #[serde(default)]
    pub delta: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUser {
    pub user_name: String,
}

/// Scores arrive as numbers, but some backends send them as text. Anything
/// else is kept as-is so one bad row cannot fail the whole response.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawScore {
    Number(serde_json::Number),
    Text(String),
    Other(serde_json::Value),
}

fn missing_score() -> RawScore {
    RawScore::Other(serde_json::Value::Null)
}

impl RawScore {
    /// Coerce to an integer score. Fractions are truncated; text that is not
    /// numeric yields `None`.
    pub fn coerce(&self) -> Option<i64> {
        match self {
            RawScore::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
            RawScore::Text(text) => {
                let text = text.trim();
                text.parse::<i64>()
                    .ok()
                    .or_else(|| text.parse::<f64>().ok().and_then(truncate))
            }
            RawScore::Other(_) => None,
        }
    }
}

fn truncate(value: f64) -> Option<i64> {
    if value.is_finite() && value >= i64::MIN as f64 && value <= i64::MAX as f64 {
        Some(value.trunc() as i64)
    } else {
        None
    }
}

/// Turn raw rows into records.
///
/// Rank is the row's 1-based response position. A row whose score cannot be
/// coerced is dropped and the others keep their positional rank.
pub fn normalize(data: ScoresData) -> ScorePage {
    let records = data
        .rankings
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| {
            let Some(score_value) = raw.score.coerce() else {
                tracing::warn!(
                    "Dropping ranking row {} ({}): score {:?} is not numeric",
                    raw.score_id,
                    raw.user.user_name,
                    raw.score
                );
                return None;
            };
            Some(RankingRecord {
                id: raw.score_id,
                rank: index as u32 + 1,
                display_name: raw.user.user_name,
                score_value,
                pp_value: raw.pp,
                delta: raw.delta,
            })
        })
        .collect();

    ScorePage {
        records,
        metadata: ScoreMetadata {
            recently_inactive: data.inactives.recently_inactive,
            total_inactives: data.total,
        },
    }
}
