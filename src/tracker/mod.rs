//! Record store and query engine for tracked job applications.
//!
//! [`ApplicationStore`] owns the collection and funnels every mutation through a full rewrite of
//! the backing storage. Queries borrow from the store and never touch storage.

pub mod dates;
pub mod domain;
pub mod export;
pub mod stats;
pub mod storage;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{ApplicationForm, ApplicationId, ApplicationStatus, JobApplication, NewApplication};
pub use export::{export_csv, ExportError};
pub use stats::{ApplicationStatistics, StatusCount, UPCOMING_WINDOW_DAYS};
pub use storage::{ApplicationStorage, JsonFileStorage, MemoryStorage, StorageError};
pub use store::{ApplicationStore, StoreError, UpdateOutcome};
