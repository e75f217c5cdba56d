//! Collaborator ports the wizard depends on
//!
//! Concrete implementations live in [`crate::infrastructure`]: file-backed
//! adapters for the CLI and in-memory ones for tests.

use std::future::Future;

use crate::models::{Period, RecordId, School, StoredRow};

/// Read-only school registry
pub trait SchoolDirectory: Send + Sync {
    /// All registered schools, in no particular order
    fn list_schools(&self) -> impl Future<Output = anyhow::Result<Vec<School>>> + Send;
}

/// Store of monthly rows, one per (school, period)
pub trait RecordStore: Send + Sync {
    /// Row stored for the pair, if any
    fn find_one(
        &self,
        school: &str,
        period: Period,
    ) -> impl Future<Output = anyhow::Result<Option<StoredRow>>> + Send;

    /// Write a row and return its id
    ///
    /// Updates by id when the row carries one, otherwise replaces whatever row
    /// occupies the same (school, period), otherwise inserts.
    fn upsert(&self, row: StoredRow) -> impl Future<Output = anyhow::Result<RecordId>> + Send;

    /// Number of pending markers stored for the period
    fn count_pending(&self, period: Period) -> impl Future<Output = anyhow::Result<usize>> + Send;
}

/// String key-value store scoped to the user's session
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = anyhow::Result<Option<String>>> + Send;

    fn set(&self, key: &str, value: String) -> impl Future<Output = anyhow::Result<()>> + Send;

    fn delete(&self, key: &str) -> impl Future<Output = anyhow::Result<()>> + Send;
}
