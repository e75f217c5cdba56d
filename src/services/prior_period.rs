//! Prior-period resolver - service layer
//!
//! Decides how the form for a school starts out: from this period's record,
//! from last period's identifying fields, or blank.

use tracing::{debug, warn};

use crate::error::ResolveError;
use crate::models::{Period, Record, School, StoredRow};
use crate::ports::RecordStore;

/// Outcome of resolving a school for a period
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedState {
    /// This period already has a record; the form shows it locked
    Filled(Record),
    /// Only the previous period has a record; its identifying fields are carried
    Carried(Record),
    /// Nothing to start from
    Empty,
}

impl ResolvedState {
    pub fn is_filled(&self) -> bool {
        matches!(self, ResolvedState::Filled(_))
    }
}

/// Prior-period resolver
///
/// A pending marker for the active period is not a record: resolution goes on
/// to the previous period. A pending marker there carries nothing.
pub struct PriorPeriodResolver<'a, R> {
    store: &'a R,
}

impl<'a, R: RecordStore> PriorPeriodResolver<'a, R> {
    pub fn new(store: &'a R) -> Self {
        Self { store }
    }

    /// Resolve the starting state for `school` in `period`
    ///
    /// Lookup failures are logged and resolve to [`ResolvedState::Empty`] so
    /// data entry can continue. No retry.
    pub async fn resolve(&self, school: &School, period: Period) -> ResolvedState {
        match self.try_resolve(school, period).await {
            Ok(state) => state,
            Err(e) => {
                warn!("⚠️ {}; starting from a blank form", e);
                ResolvedState::Empty
            }
        }
    }

    async fn try_resolve(
        &self,
        school: &School,
        period: Period,
    ) -> Result<ResolvedState, ResolveError> {
        match self.lookup(school, period).await? {
            Some(StoredRow::Record(record)) => {
                debug!("{} already filled for {}", school.name, period);
                return Ok(ResolvedState::Filled(record));
            }
            Some(StoredRow::Pending(_)) => {
                debug!("{} is pending for {}", school.name, period);
            }
            None => {}
        }

        let previous = period.previous();
        match self.lookup(school, previous).await? {
            Some(StoredRow::Record(record)) => {
                debug!("{}: carrying cadastro from {}", school.name, previous);
                Ok(ResolvedState::Carried(record))
            }
            Some(StoredRow::Pending(_)) | None => Ok(ResolvedState::Empty),
        }
    }

    async fn lookup(
        &self,
        school: &School,
        period: Period,
    ) -> Result<Option<StoredRow>, ResolveError> {
        self.store
            .find_one(&school.name, period)
            .await
            .map_err(|e| ResolveError::lookup(&school.name, period, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemoryRecordStore;
    use crate::models::PendingMarker;
    use crate::test_support::record;

    fn dezembro() -> Period {
        "Dezembro/2025".parse().unwrap()
    }

    #[tokio::test]
    async fn test_filled_wins_over_previous() {
        let store = MemoryRecordStore::with_rows([
            StoredRow::Record(record("EMEF Alfa", dezembro(), "atual")),
            StoredRow::Record(record("EMEF Alfa", dezembro().previous(), "anterior")),
        ]);

        let state = PriorPeriodResolver::new(&store)
            .resolve(&School::named("1", "EMEF Alfa"), dezembro())
            .await;

        match state {
            ResolvedState::Filled(r) => assert_eq!(r.registration_code, "atual"),
            other => panic!("expected Filled, got {:?}", other),
        }
        assert_eq!(store.lookups(), 1);
    }

    #[tokio::test]
    async fn test_carried_from_previous_month() {
        let store = MemoryRecordStore::with_rows([StoredRow::Record(record(
            "EMEF Alfa",
            "Novembro/2025".parse().unwrap(),
            "123",
        ))]);

        let state = PriorPeriodResolver::new(&store)
            .resolve(&School::named("1", "EMEF Alfa"), dezembro())
            .await;

        assert!(matches!(state, ResolvedState::Carried(ref r) if r.registration_code == "123"));
    }

    #[tokio::test]
    async fn test_january_looks_at_previous_december() {
        let store = MemoryRecordStore::with_rows([StoredRow::Record(record(
            "EMEF Alfa",
            "Dezembro/2024".parse().unwrap(),
            "dez",
        ))]);

        let state = PriorPeriodResolver::new(&store)
            .resolve(&School::named("1", "EMEF Alfa"), "Janeiro/2025".parse().unwrap())
            .await;

        assert!(matches!(state, ResolvedState::Carried(_)));
    }

    #[tokio::test]
    async fn test_pending_current_falls_through_to_previous() {
        let store = MemoryRecordStore::with_rows([
            StoredRow::Pending(PendingMarker::new("EMEF Alfa", dezembro())),
            StoredRow::Record(record("EMEF Alfa", dezembro().previous(), "123")),
        ]);

        let state = PriorPeriodResolver::new(&store)
            .resolve(&School::named("1", "EMEF Alfa"), dezembro())
            .await;

        assert!(matches!(state, ResolvedState::Carried(_)));
    }

    #[tokio::test]
    async fn test_pending_previous_carries_nothing() {
        let store = MemoryRecordStore::with_rows([StoredRow::Pending(PendingMarker::new(
            "EMEF Alfa",
            dezembro().previous(),
        ))]);

        let state = PriorPeriodResolver::new(&store)
            .resolve(&School::named("1", "EMEF Alfa"), dezembro())
            .await;

        assert_eq!(state, ResolvedState::Empty);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_empty() {
        let store = MemoryRecordStore::with_rows([StoredRow::Record(record(
            "EMEF Alfa",
            dezembro(),
            "123",
        ))]);
        store.set_failing_reads(true);

        let state = PriorPeriodResolver::new(&store)
            .resolve(&School::named("1", "EMEF Alfa"), dezembro())
            .await;

        assert_eq!(state, ResolvedState::Empty);
        assert_eq!(store.lookups(), 1);
    }
}
