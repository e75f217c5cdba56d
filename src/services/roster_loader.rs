//! Roster loader - service layer
//!
//! Only knows how to fetch and order the schools; it does not care what the
//! wizard does with them.

use tracing::{debug, error};

use crate::error::LoadError;
use crate::models::School;
use crate::ports::SchoolDirectory;

/// Roster loader
///
/// Responsibilities:
/// - one fetch from the school directory per call
/// - reject entries without id or name
/// - order by display name
pub struct RosterLoader<D> {
    directory: D,
}

impl<D: SchoolDirectory> RosterLoader<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    /// Load the roster sorted by display name (case-insensitive, ties by exact name)
    ///
    /// No retry: a failure is final for the session.
    pub async fn load(&self) -> Result<Vec<School>, LoadError> {
        let mut schools = self.directory.list_schools().await.map_err(|e| {
            error!("❌ failed to load the school roster: {:#}", e);
            LoadError::unreachable(e)
        })?;

        if let Some((position, reason)) = schools.iter().enumerate().find_map(|(i, s)| {
            if s.id.trim().is_empty() {
                Some((i, "empty id"))
            } else if s.name.trim().is_empty() {
                Some((i, "empty name"))
            } else {
                None
            }
        }) {
            error!("❌ school directory returned a malformed entry at {}: {}", position, reason);
            return Err(LoadError::Malformed {
                position,
                reason: reason.to_string(),
            });
        }

        schools.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });

        debug!("roster loaded: {} schools", schools.len());
        Ok(schools)
    }
}
