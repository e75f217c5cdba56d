//! Entry form state - workflow layer
//!
//! The in-progress bill of the school under the cursor: one or more
//! cadastros plus two free-text fields. Nothing is validated here; commit
//! decides what is acceptable.

use tracing::debug;

use crate::models::{CadastroEntry, CadastroField, Period, Record, RecordId};
use crate::services::ResolvedState;
use crate::utils::format::{parse_count, parse_date, parse_decimal, parse_money};

/// Entry form state
#[derive(Debug, Clone, PartialEq)]
pub struct EntryForm {
    /// Never empty
    cadastros: Vec<CadastroEntry>,
    service_description: String,
    pending_notes: String,
    /// Id of the record this form was filled from
    record_id: Option<RecordId>,
    /// School already has a record for the period
    filled: bool,
    /// User asked to edit a filled form
    unlocked: bool,
    /// Stored total not covered by the loaded cadastro
    ///
    /// A record keeps only its first cadastro field by field; the other
    /// cadastros survive as this share of `total_value`.
    extra_total: f64,
}

impl Default for EntryForm {
    fn default() -> Self {
        Self {
            cadastros: vec![CadastroEntry::default()],
            service_description: String::new(),
            pending_notes: String::new(),
            record_id: None,
            filled: false,
            unlocked: false,
            extra_total: 0.0,
        }
    }
}

impl EntryForm {
    /// Blank form with one empty cadastro
    pub fn new() -> Self {
        Self::default()
    }

    /// Form as it starts for a resolved school
    pub fn from_resolved(state: &ResolvedState) -> Self {
        match state {
            ResolvedState::Filled(record) => Self {
                cadastros: vec![CadastroEntry::from_record(record)],
                service_description: record.service_description.clone(),
                pending_notes: record.pending_notes.clone(),
                record_id: record.id.clone(),
                filled: true,
                unlocked: false,
                extra_total: record.total_value - record.amount,
            },
            ResolvedState::Carried(prior) => Self {
                cadastros: vec![CadastroEntry::carried_from(prior)],
                ..Self::default()
            },
            ResolvedState::Empty => Self::default(),
        }
    }

    pub fn cadastros(&self) -> &[CadastroEntry] {
        &self.cadastros
    }

    pub fn service_description(&self) -> &str {
        &self.service_description
    }

    pub fn pending_notes(&self) -> &str {
        &self.pending_notes
    }

    pub fn record_id(&self) -> Option<&RecordId> {
        self.record_id.as_ref()
    }

    pub fn is_filled(&self) -> bool {
        self.filled
    }

    /// Share of a saved total that belongs to cadastros not shown in the form
    pub fn extra_total(&self) -> f64 {
        self.extra_total
    }

    /// Fields accept changes
    pub fn is_editable(&self) -> bool {
        !self.filled || self.unlocked
    }

    /// Unlock a filled form; no effect on a fresh one
    pub fn request_edit(&mut self) {
        if self.filled {
            self.unlocked = true;
        }
    }

    /// Append a blank cadastro
    ///
    /// # Returns
    /// `false` when the form is locked
    pub fn add_cadastro(&mut self) -> bool {
        if !self.is_editable() {
            return false;
        }
        self.cadastros.push(CadastroEntry::default());
        true
    }

    /// Remove cadastro `index`
    ///
    /// The last remaining cadastro is never removed.
    pub fn remove_cadastro(&mut self, index: usize) -> bool {
        if !self.is_editable() || self.cadastros.len() <= 1 || index >= self.cadastros.len() {
            debug!(
                "remove_cadastro({}) ignored ({} cadastros)",
                index,
                self.cadastros.len()
            );
            return false;
        }
        self.cadastros.remove(index);
        true
    }

    /// Overwrite one field of cadastro `index`
    pub fn set_field(&mut self, index: usize, field: CadastroField, value: impl Into<String>) -> bool {
        if !self.is_editable() {
            return false;
        }
        match self.cadastros.get_mut(index) {
            Some(entry) => {
                *entry.field_mut(field) = value.into();
                true
            }
            None => {
                debug!("set_field: no cadastro {}", index);
                false
            }
        }
    }

    pub fn set_service_description(&mut self, text: impl Into<String>) -> bool {
        if !self.is_editable() {
            return false;
        }
        self.service_description = text.into();
        true
    }

    pub fn set_pending_notes(&mut self, text: impl Into<String>) -> bool {
        if !self.is_editable() {
            return false;
        }
        self.pending_notes = text.into();
        true
    }

    /// Sum of every cadastro's amount plus [`EntryForm::extra_total`]
    ///
    /// Unparseable amounts count as 0.
    pub fn total_value(&self) -> f64 {
        self.cadastros
            .iter()
            .map(|c| parse_money(&c.amount))
            .sum::<f64>()
            + self.extra_total
    }

    /// Registration code of the first cadastro, trimmed
    pub fn primary_registration_code(&self) -> &str {
        self.cadastros
            .first()
            .map(|c| c.registration_code.trim())
            .unwrap_or_default()
    }

    /// Record to persist for `school` in `period`
    ///
    /// Only the first cadastro is stored field by field; the others only add
    /// to the total.
    pub fn to_record(&self, school: &str, period: Period) -> Record {
        let first = self.cadastros.first().cloned().unwrap_or_default();
        let withholding_tax = if first.withholding_tax.trim().is_empty() {
            None
        } else {
            Some(parse_money(&first.withholding_tax))
        };

        Record {
            id: self.record_id.clone(),
            school: school.to_string(),
            period,
            registration_code: first.registration_code.trim().to_string(),
            meter_id: first.meter_id.trim().to_string(),
            consumption: parse_decimal(&first.consumption),
            billing_days: parse_count(&first.billing_days),
            previous_reading: parse_date(&first.previous_reading),
            current_reading: parse_date(&first.current_reading),
            due_date: parse_date(&first.due_date),
            amount: parse_money(&first.amount),
            withholding_tax,
            installation_type: first.installation_type.trim().to_string(),
            used_by: first.used_by.trim().to_string(),
            total_value: self.total_value(),
            service_description: self.service_description.clone(),
            pending_notes: self.pending_notes.clone(),
        }
    }
}
