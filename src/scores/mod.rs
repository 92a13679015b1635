//! Score-fetch collaborators.
//!
//! A [`ScoreSource`] delivers the full ranking for one selection. The HTTP
//! implementation talks to the scores API; tests plug in their own sources.

pub mod http;
pub mod normalize;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ScorePage, Selection};

pub use http::HttpScoreSource;
pub use normalize::{ScoresResponse, normalize};

/// Fetches the ranking dataset for a selection.
#[async_trait]
pub trait ScoreSource: Send + Sync {
    async fn fetch_scores(&self, selection: Selection) -> Result<ScorePage>;
}
