//! Port adapters
//!
//! - `toml_directory` / `json_record_store` / `json_kv_store`: file-backed, used by the CLI
//! - `memory`: in-process, used by tests and embedders that bring their own persistence

pub mod json_kv_store;
pub mod json_record_store;
pub mod memory;
pub mod toml_directory;

pub use json_kv_store::JsonKeyValueStore;
pub use json_record_store::JsonRecordStore;
pub use memory::{MemoryDirectory, MemoryKeyValueStore, MemoryRecordStore};
pub use toml_directory::TomlSchoolDirectory;

use crate::models::{RecordId, StoredRow};

/// Shared upsert rule for the row-list backed stores
///
/// Match by id first, then by (school, period); the matched row keeps its id.
pub(crate) fn upsert_row(rows: &mut Vec<StoredRow>, mut row: StoredRow) -> RecordId {
    let next_id = rows
        .iter()
        .filter_map(|r| r.id()?.0.parse::<u64>().ok())
        .max()
        .unwrap_or(0)
        + 1;

    let by_id = row
        .id()
        .and_then(|id| rows.iter().position(|r| r.id() == Some(id)));
    let slot = by_id.or_else(|| {
        rows.iter()
            .position(|r| r.is_for(row.school(), row.period()))
    });

    match slot {
        Some(pos) => {
            let id = rows[pos]
                .id()
                .or(row.id())
                .cloned()
                .unwrap_or_else(|| RecordId(next_id.to_string()));
            row.set_id(id.clone());
            rows[pos] = row;
            id
        }
        None => {
            let id = row
                .id()
                .cloned()
                .unwrap_or_else(|| RecordId(next_id.to_string()));
            row.set_id(id.clone());
            rows.push(row);
            id
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Period, PendingMarker};

    #[test]
    fn test_upsert_row_replaces_same_slot() {
        let period: Period = "Maio/2025".parse().unwrap();
        let mut rows = Vec::new();

        let first = upsert_row(&mut rows, StoredRow::Pending(PendingMarker::new("A", period)));
        let second = upsert_row(&mut rows, StoredRow::Pending(PendingMarker::new("A", period)));
        let other = upsert_row(&mut rows, StoredRow::Pending(PendingMarker::new("B", period)));

        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_upsert_row_assigns_increasing_ids() {
        let period: Period = "Maio/2025".parse().unwrap();
        let mut rows = Vec::new();
        let a = upsert_row(&mut rows, StoredRow::Pending(PendingMarker::new("A", period)));
        let b = upsert_row(
            &mut rows,
            StoredRow::Pending(PendingMarker::new("A", period.previous())),
        );
        assert_eq!(a.0, "1");
        assert_eq!(b.0, "2");
    }
}
