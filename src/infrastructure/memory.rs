//! In-memory adapters
//!
//! Cloning an adapter shares its state, so a test can keep a handle, hand a
//! clone to the wizard and inspect what was written. Each adapter counts its
//! calls and can be switched into a failing mode.

use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::infrastructure::upsert_row;
use crate::models::{Period, RecordId, School, StoredRow};
use crate::ports::{KeyValueStore, RecordStore, SchoolDirectory};

/// Fixed school list
#[derive(Clone, Default)]
pub struct MemoryDirectory {
    schools: Arc<Mutex<Vec<School>>>,
    fail: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl MemoryDirectory {
    pub fn new(schools: Vec<School>) -> Self {
        Self {
            schools: Arc::new(Mutex::new(schools)),
            ..Self::default()
        }
    }

    /// Make every subsequent call fail
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SchoolDirectory for MemoryDirectory {
    async fn list_schools(&self) -> Result<Vec<School>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("school directory unavailable"));
        }
        let schools = self
            .schools
            .lock()
            .map_err(|_| anyhow!("school directory lock poisoned"))?;
        Ok(schools.clone())
    }
}

/// Row list with upsert semantics
#[derive(Clone, Default)]
pub struct MemoryRecordStore {
    rows: Arc<Mutex<Vec<StoredRow>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    lookups: Arc<AtomicUsize>,
    upserts: Arc<AtomicUsize>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with rows (ids are assigned as by `upsert`)
    pub fn with_rows(rows: impl IntoIterator<Item = StoredRow>) -> Self {
        let store = Self::default();
        if let Ok(mut guard) = store.rows.lock() {
            for row in rows {
                upsert_row(&mut guard, row);
            }
        }
        store
    }

    pub fn set_failing_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_failing_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of every stored row
    pub fn rows(&self) -> Vec<StoredRow> {
        self.rows.lock().map(|rows| rows.clone()).unwrap_or_default()
    }

    /// Number of `find_one` calls so far
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Number of `upsert` calls so far, failed ones included
    pub fn upserts(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }
}

impl RecordStore for MemoryRecordStore {
    async fn find_one(&self, school: &str, period: Period) -> Result<Option<StoredRow>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(anyhow!("record store unavailable"));
        }
        let rows = self
            .rows
            .lock()
            .map_err(|_| anyhow!("record store lock poisoned"))?;
        Ok(rows.iter().find(|r| r.is_for(school, period)).cloned())
    }

    async fn upsert(&self, row: StoredRow) -> Result<RecordId> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("record store rejected the write"));
        }
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| anyhow!("record store lock poisoned"))?;
        Ok(upsert_row(&mut rows, row))
    }

    async fn count_pending(&self, period: Period) -> Result<usize> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| anyhow!("record store lock poisoned"))?;
        Ok(rows
            .iter()
            .filter(|r| r.is_pending() && r.period() == period)
            .count())
    }
}

/// Session key-value store
#[derive(Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    fail: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Total get/set/delete calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Raw stored value, bypassing call accounting
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    fn check(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("session storage unavailable"));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("session storage lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.check()?;
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("session storage lock poisoned"))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.check()?;
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("session storage lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}
