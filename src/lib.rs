pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod scores;
pub mod search;
pub mod settings;
pub mod sync;
pub mod types;

pub use config::Config;
pub use display::{Presenter, TablePresenter};
pub use error::{RankboardError, Result};
pub use scores::{HttpScoreSource, ScoreSource};
pub use search::{FuzzySearch, SearchError, SearchPrimitive};
pub use settings::{Settings, SettingsHandle, Theme};
pub use sync::{
    Command, Effect, SyncCoordinator, SyncEvent, SyncOptions, ViewState, ViewportMetrics,
    ViewportSize,
};
pub use types::{RankingRecord, ScoreMetadata, ScorePage, Scope, Selection};
