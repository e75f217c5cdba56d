//! Record store persisted as a JSON array of flat rows

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::infrastructure::json_kv_store::write_atomically;
use crate::infrastructure::upsert_row;
use crate::models::{Period, RecordId, RecordRow, StoredRow};
use crate::ports::RecordStore;

/// Record store backed by one JSON file
///
/// Rows are stored in [`RecordRow`] layout so other tools reading the file see
/// pending markers as `"PENDENTE"` registration codes.
pub struct JsonRecordStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<StoredRow>> {
        let exists = fs::try_exists(&self.path)
            .await
            .with_context(|| format!("failed to check {}", self.path.display()))?;
        if !exists {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<RecordRow> = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        Ok(rows.into_iter().map(StoredRow::from).collect())
    }

    async fn save(&self, rows: Vec<StoredRow>) -> Result<()> {
        let rows: Vec<RecordRow> = rows.into_iter().map(RecordRow::from).collect();
        let content = serde_json::to_string_pretty(&rows)?;
        write_atomically(&self.path, content.as_bytes()).await
    }
}

impl RecordStore for JsonRecordStore {
    async fn find_one(&self, school: &str, period: Period) -> Result<Option<StoredRow>> {
        let rows = self.load().await?;
        Ok(rows.into_iter().find(|r| r.is_for(school, period)))
    }

    async fn upsert(&self, row: StoredRow) -> Result<RecordId> {
        let _guard = self.write_lock.lock().await;
        let mut rows = self.load().await?;
        let id = upsert_row(&mut rows, row);
        self.save(rows).await?;
        debug!("record {} written to {}", id, self.path.display());
        Ok(id)
    }

    async fn count_pending(&self, period: Period) -> Result<usize> {
        let rows = self.load().await?;
        Ok(rows
            .iter()
            .filter(|r| r.is_pending() && r.period() == period)
            .count())
    }
}
