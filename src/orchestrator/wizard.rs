//! Monthly batch entry wizard - orchestration layer
//!
//! ## Responsibilities
//!
//! Walks the school roster one school at a time for a single period:
//!
//! 1. **Open**: load the roster, restore the saved cursor, resolve the first school
//! 2. **Commit**: validate, upsert the record, advance
//! 3. **Skip**: upsert a pending marker (best-effort), advance
//! 4. **Previous**: step back without writing anything
//! 5. **Finish**: clear the cursor and call the closing callback
//!
//! ## State machine
//!
//! ```text
//! open ─► Viewing(i) ──commit──► Committing ──ok──► Advancing ─► Viewing(i+1)
//!   │        │   ▲                   └─err─► Viewing(i)      └──► Exhausted
//!   │        │   └──previous──┘
//!   │        └──skip──► Skipping ──(ok or err)──► Advancing
//!   └─► EmptyRoster (no schools / load failed)
//! ```
//!
//! Actions take `&mut self`, so only one school is ever in flight. Dropping
//! an action future mid-way leaves the previous cursor in storage.

use tracing::{error, info, warn};

use crate::error::{CommitError, NavigationError, SkipError};
use crate::models::{PendingMarker, Period, School, StoredRow, PENDING_SENTINEL};
use crate::ports::{KeyValueStore, RecordStore, SchoolDirectory};
use crate::services::{CursorStore, PriorPeriodResolver, ResolvedState, RosterLoader};
use crate::workflow::{EntryCtx, EntryForm};

/// Message shown when there is nothing to iterate
pub const EMPTY_ROSTER_MESSAGE: &str =
    "Nenhuma escola para processar: cadastre as escolas primeiro.";

/// Callback invoked once when the wizard finishes or is dismissed
pub type CloseCallback = Box<dyn FnMut() + Send>;

/// Wizard state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    /// Showing the school at this roster index
    Viewing(usize),
    Committing,
    Skipping,
    Advancing,
    /// Every school visited
    Exhausted,
    /// Roster empty or failed to load
    EmptyRoster,
    /// Dismissed by the user
    Closed,
}

impl WizardState {
    pub fn name(&self) -> &'static str {
        match self {
            WizardState::Viewing(_) => "viewing",
            WizardState::Committing => "committing",
            WizardState::Skipping => "skipping",
            WizardState::Advancing => "advancing",
            WizardState::Exhausted => "exhausted",
            WizardState::EmptyRoster => "empty roster",
            WizardState::Closed => "closed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WizardState::Exhausted | WizardState::EmptyRoster | WizardState::Closed
        )
    }
}

/// Where an action left the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Showing the school at this index
    Viewing(usize),
    /// Roster finished
    Exhausted,
}

/// Per-session counters
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionStats {
    pub committed: usize,
    pub skipped: usize,
    /// Skips whose pending marker could not be written
    pub skip_failures: usize,
    pub back_navigations: usize,
}

/// Monthly batch entry wizard
pub struct Wizard<R, K> {
    records: R,
    cursor: CursorStore<K>,
    period: Period,
    roster: Vec<School>,
    state: WizardState,
    resolved: ResolvedState,
    form: EntryForm,
    stats: SessionStats,
    load_error: Option<String>,
    on_close: Option<CloseCallback>,
}

impl<R, K> Wizard<R, K>
where
    R: RecordStore,
    K: KeyValueStore,
{
    /// Open the wizard for `period`
    ///
    /// # Arguments
    /// - `directory`: source of the roster, read once
    /// - `records`: record store for lookups and writes
    /// - `cursor`: progress memory, restored here
    /// - `on_close`: invoked when the roster is finished or the wizard is dismissed
    ///
    /// # Returns
    /// A wizard in `Viewing` or, when there is no school to show, in `EmptyRoster`.
    /// In the latter case neither the cursor nor the record store is touched.
    pub async fn open<D: SchoolDirectory>(
        directory: D,
        records: R,
        cursor: CursorStore<K>,
        period: Period,
        on_close: CloseCallback,
    ) -> Self {
        let mut wizard = Self {
            records,
            cursor,
            period,
            roster: Vec::new(),
            state: WizardState::EmptyRoster,
            resolved: ResolvedState::Empty,
            form: EntryForm::new(),
            stats: SessionStats::default(),
            load_error: None,
            on_close: Some(on_close),
        };

        match RosterLoader::new(directory).load().await {
            Ok(roster) => wizard.roster = roster,
            Err(e) => {
                wizard.load_error = Some(e.to_string());
                warn!("⚠️ {}", EMPTY_ROSTER_MESSAGE);
                return wizard;
            }
        }

        if wizard.roster.is_empty() {
            warn!("⚠️ {}", EMPTY_ROSTER_MESSAGE);
            return wizard;
        }

        let restored = wizard.cursor.restore(period, wizard.roster.len()).await;
        let index = match restored {
            Some(index) => {
                info!("↩️ resuming {} at school {}/{}", period, index + 1, wizard.roster.len());
                index
            }
            None => 0,
        };

        wizard.show(index).await;
        wizard
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn roster(&self) -> &[School] {
        &self.roster
    }

    /// Index of the school on screen
    pub fn index(&self) -> Option<usize> {
        match self.state {
            WizardState::Viewing(index) => Some(index),
            _ => None,
        }
    }

    pub fn current_school(&self) -> Option<&School> {
        self.index().and_then(|i| self.roster.get(i))
    }

    /// How the current form was pre-filled
    pub fn resolved(&self) -> &ResolvedState {
        &self.resolved
    }

    pub fn form(&self) -> &EntryForm {
        &self.form
    }

    /// Form of the school on screen, `None` outside `Viewing`
    pub fn form_mut(&mut self) -> Option<&mut EntryForm> {
        match self.state {
            WizardState::Viewing(_) => Some(&mut self.form),
            _ => None,
        }
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Why the roster failed to load, when it did
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Commit, skip and previous are accepted
    pub fn actions_enabled(&self) -> bool {
        matches!(self.state, WizardState::Viewing(_))
    }

    /// Skip is offered only for schools not yet filled, or being edited
    pub fn can_skip(&self) -> bool {
        self.actions_enabled() && self.form.is_editable()
    }

    /// Log context of the school on screen
    pub fn ctx(&self) -> Option<EntryCtx> {
        let index = self.index()?;
        let school = self.roster.get(index)?;
        Some(EntryCtx::new(
            self.period,
            index,
            self.roster.len(),
            school.name.clone(),
        ))
    }

    /// Unlock the form of an already filled school
    pub fn request_edit(&mut self) {
        if let (Some(ctx), true) = (self.ctx(), self.form.is_filled()) {
            info!("{} ✏️ editing saved record", ctx);
            self.form.request_edit();
        }
    }

    /// Pending markers stored for the active period
    pub async fn pending_count(&self) -> anyhow::Result<usize> {
        self.records.count_pending(self.period).await
    }

    /// Save the form and move to the next school
    ///
    /// Only the first cadastro's registration code is required. A filled
    /// school that was not unlocked is left as stored and the wizard just
    /// moves on. On a store failure the wizard stays on the same school.
    pub async fn commit(&mut self) -> Result<Step, CommitError> {
        let (index, ctx) = match (self.index(), self.ctx()) {
            (Some(index), Some(ctx)) => (index, ctx),
            _ => {
                return Err(CommitError::NotViewing {
                    state: self.state.name(),
                })
            }
        };

        if !self.form.is_editable() {
            info!("{} 🔒 already filled, kept as saved", ctx);
            return Ok(self.advance(index).await);
        }

        let code = self.form.primary_registration_code();
        if code.is_empty() {
            warn!("{} ⚠️ registration code missing, not saved", ctx);
            return Err(CommitError::MissingRegistrationCode { school: ctx.school });
        }
        if code.eq_ignore_ascii_case(PENDING_SENTINEL) {
            warn!("{} ⚠️ registration code '{}' is reserved, not saved", ctx, code);
            return Err(CommitError::ReservedRegistrationCode {
                school: ctx.school,
                code: code.to_string(),
            });
        }

        self.state = WizardState::Committing;
        let record = self.form.to_record(&ctx.school, self.period);
        let action = if record.id.is_some() { "updated" } else { "saved" };

        match self.records.upsert(StoredRow::Record(record)).await {
            Ok(id) => {
                info!("{} ✓ record {} (id {})", ctx, action, id);
                self.stats.committed += 1;
            }
            Err(e) => {
                self.state = WizardState::Viewing(index);
                let err = CommitError::persist(ctx.school.as_str(), self.period, e);
                error!("{} ❌ {}", ctx, err);
                return Err(err);
            }
        }

        Ok(self.advance(index).await)
    }

    /// Mark the school pending and move to the next one
    ///
    /// A failed write is logged and the wizard advances anyway.
    pub async fn skip(&mut self) -> Result<Step, SkipError> {
        let (index, ctx) = match (self.index(), self.ctx()) {
            (Some(index), Some(ctx)) => (index, ctx),
            _ => {
                return Err(SkipError::NotViewing {
                    state: self.state.name(),
                })
            }
        };

        if !self.form.is_editable() {
            return Err(SkipError::NotAllowed { school: ctx.school });
        }

        self.state = WizardState::Skipping;
        let marker = PendingMarker::new(ctx.school.as_str(), self.period);

        match self.records.upsert(StoredRow::Pending(marker)).await {
            Ok(_) => {
                info!("{} ⏭️ marked pending", ctx);
                self.stats.skipped += 1;
            }
            Err(e) => {
                let err = SkipError::persist(ctx.school.as_str(), self.period, e);
                warn!("{} ⚠️ {}", ctx, err);
                self.stats.skip_failures += 1;
            }
        }

        Ok(self.advance(index).await)
    }

    /// Step back one school (stays at 0) without committing or skipping
    pub async fn previous(&mut self) -> Result<usize, NavigationError> {
        let index = self.index().ok_or(NavigationError::NotViewing {
            state: self.state.name(),
        })?;

        let target = index.saturating_sub(1);
        if target != index {
            self.stats.back_navigations += 1;
        }
        self.show(target).await;
        Ok(target)
    }

    /// Close the wizard on user request
    pub fn dismiss(&mut self) {
        if self.state != WizardState::Closed {
            info!("👋 wizard closed at state {}", self.state.name());
        }
        self.state = WizardState::Closed;
        self.notify_close();
    }

    async fn advance(&mut self, index: usize) -> Step {
        self.state = WizardState::Advancing;

        let next = index + 1;
        if next < self.roster.len() {
            self.show(next).await;
            return Step::Viewing(next);
        }

        self.cursor.clear(self.period).await;
        self.state = WizardState::Exhausted;
        info!(
            "✅ {}: all {} schools processed",
            self.period,
            self.roster.len()
        );
        self.notify_close();
        Step::Exhausted
    }

    /// Resolve the school at `index`, then save the cursor, then hand control back
    async fn show(&mut self, index: usize) {
        let Some(school) = self.roster.get(index) else {
            return;
        };

        let resolved = PriorPeriodResolver::new(&self.records)
            .resolve(school, self.period)
            .await;
        self.form = EntryForm::from_resolved(&resolved);
        self.resolved = resolved;

        self.cursor.persist(self.period, index).await;
        self.state = WizardState::Viewing(index);

        if let Some(ctx) = self.ctx() {
            let origin = match &self.resolved {
                ResolvedState::Filled(_) => "already filled",
                ResolvedState::Carried(_) => "carried from previous month",
                ResolvedState::Empty => "blank",
            };
            info!("{} 📋 {}", ctx, origin);
        }
    }

    fn notify_close(&mut self) {
        if let Some(mut on_close) = self.on_close.take() {
            on_close();
        }
    }
}
