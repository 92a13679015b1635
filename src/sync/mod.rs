//! Synchronization of the ranking table's four asynchronous inputs.
//!
//! - [`dataset`]: canonical dataset per selection, last-issued fetch wins
//! - [`search_orchestrator`]: debounced filtering through a search primitive
//! - [`viewport`]: rows per page from viewport size, debounced on resize
//! - [`pagination`]: page bounds and slicing
//! - [`coordinator`]: wires the above onto one event queue

pub mod coordinator;
pub mod dataset;
pub mod debounce;
pub mod pagination;
pub mod search_orchestrator;
pub mod viewport;

pub use coordinator::{Command, Effect, SyncCoordinator, SyncEvent, SyncOptions, ViewState};
pub use dataset::{DatasetStore, FetchState};
pub use debounce::Debouncer;
pub use pagination::{PaginationController, slice, total_pages};
pub use search_orchestrator::SearchOrchestrator;
pub use viewport::{ViewportMetrics, ViewportSize, ViewportSizer};
