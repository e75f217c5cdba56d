//! Persisted monthly rows
//!
//! A (school, period) pair has at most one stored row, which is either an
//! authoritative [`Record`] or a [`PendingMarker`]. In storage the two share
//! one flat layout ([`RecordRow`]) and the marker is recognised by the
//! `"PENDENTE"` registration code; inside the crate that sentinel never
//! appears, [`StoredRow`] carries the distinction instead.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::period::Period;

/// Registration code written for pending rows
pub const PENDING_SENTINEL: &str = "PENDENTE";

/// Opaque row id assigned by the record store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authoritative monthly record of a school
///
/// Only the first cadastro of the form is stored field by field; the other
/// cadastros contribute to `total_value` alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: Option<RecordId>,
    /// School display name (the store keys on it)
    pub school: String,
    pub period: Period,
    pub registration_code: String,
    pub meter_id: String,
    pub consumption: Option<f64>,
    pub billing_days: Option<u32>,
    pub previous_reading: Option<NaiveDate>,
    pub current_reading: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub amount: f64,
    pub withholding_tax: Option<f64>,
    pub installation_type: String,
    pub used_by: String,
    /// Sum of the amounts of every cadastro in the form
    pub total_value: f64,
    pub service_description: String,
    pub pending_notes: String,
}

/// "Skipped, needs follow-up" row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMarker {
    pub id: Option<RecordId>,
    pub school: String,
    pub period: Period,
}

impl PendingMarker {
    pub fn new(school: impl Into<String>, period: Period) -> Self {
        Self {
            id: None,
            school: school.into(),
            period,
        }
    }
}

/// Row stored for a (school, period) pair
#[derive(Debug, Clone, PartialEq)]
pub enum StoredRow {
    Record(Record),
    Pending(PendingMarker),
}

impl StoredRow {
    pub fn id(&self) -> Option<&RecordId> {
        match self {
            StoredRow::Record(r) => r.id.as_ref(),
            StoredRow::Pending(p) => p.id.as_ref(),
        }
    }

    pub fn set_id(&mut self, id: RecordId) {
        match self {
            StoredRow::Record(r) => r.id = Some(id),
            StoredRow::Pending(p) => p.id = Some(id),
        }
    }

    pub fn school(&self) -> &str {
        match self {
            StoredRow::Record(r) => &r.school,
            StoredRow::Pending(p) => &p.school,
        }
    }

    pub fn period(&self) -> Period {
        match self {
            StoredRow::Record(r) => r.period,
            StoredRow::Pending(p) => p.period,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, StoredRow::Pending(_))
    }

    /// Whether this row occupies the given (school, period) slot
    pub fn is_for(&self, school: &str, period: Period) -> bool {
        self.school() == school && self.period() == period
    }
}

/// Flat storage layout shared by records and pending markers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub school: String,
    pub period: Period,
    pub registration_code: String,
    #[serde(default)]
    pub meter_id: String,
    #[serde(default)]
    pub consumption: Option<f64>,
    #[serde(default)]
    pub billing_days: Option<u32>,
    #[serde(default)]
    pub previous_reading: Option<NaiveDate>,
    #[serde(default)]
    pub current_reading: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub withholding_tax: Option<f64>,
    #[serde(default)]
    pub installation_type: String,
    #[serde(default)]
    pub used_by: String,
    #[serde(default)]
    pub total_value: Option<f64>,
    #[serde(default)]
    pub service_description: String,
    #[serde(default)]
    pub pending_notes: String,
}

impl From<StoredRow> for RecordRow {
    fn from(row: StoredRow) -> Self {
        match row {
            StoredRow::Record(r) => RecordRow {
                id: r.id,
                school: r.school,
                period: r.period,
                registration_code: r.registration_code,
                meter_id: r.meter_id,
                consumption: r.consumption,
                billing_days: r.billing_days,
                previous_reading: r.previous_reading,
                current_reading: r.current_reading,
                due_date: r.due_date,
                amount: Some(r.amount),
                withholding_tax: r.withholding_tax,
                installation_type: r.installation_type,
                used_by: r.used_by,
                total_value: Some(r.total_value),
                service_description: r.service_description,
                pending_notes: r.pending_notes,
            },
            StoredRow::Pending(p) => RecordRow {
                id: p.id,
                school: p.school,
                period: p.period,
                registration_code: PENDING_SENTINEL.to_string(),
                meter_id: String::new(),
                consumption: None,
                billing_days: None,
                previous_reading: None,
                current_reading: None,
                due_date: None,
                amount: None,
                withholding_tax: None,
                installation_type: String::new(),
                used_by: String::new(),
                total_value: None,
                service_description: String::new(),
                pending_notes: String::new(),
            },
        }
    }
}

impl From<RecordRow> for StoredRow {
    fn from(row: RecordRow) -> Self {
        if row.registration_code == PENDING_SENTINEL {
            return StoredRow::Pending(PendingMarker {
                id: row.id,
                school: row.school,
                period: row.period,
            });
        }

        StoredRow::Record(Record {
            id: row.id,
            school: row.school,
            period: row.period,
            registration_code: row.registration_code,
            meter_id: row.meter_id,
            consumption: row.consumption,
            billing_days: row.billing_days,
            previous_reading: row.previous_reading,
            current_reading: row.current_reading,
            due_date: row.due_date,
            amount: row.amount.unwrap_or_default(),
            withholding_tax: row.withholding_tax,
            installation_type: row.installation_type,
            used_by: row.used_by,
            total_value: row.total_value.unwrap_or_default(),
            service_description: row.service_description,
            pending_notes: row.pending_notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period() -> Period {
        "Março/2025".parse().unwrap()
    }

    #[test]
    fn test_pending_row_uses_sentinel_in_storage() {
        let row = RecordRow::from(StoredRow::Pending(PendingMarker::new("EMEF Alfa", period())));
        assert_eq!(row.registration_code, PENDING_SENTINEL);
        assert!(row.amount.is_none());

        let back = StoredRow::from(row);
        assert!(back.is_pending());
        assert!(back.is_for("EMEF Alfa", period()));
    }

    #[test]
    fn test_stored_json_layout() {
        let json = r#"{
            "id": "7",
            "school": "EMEF Beta",
            "period": "Março/2025",
            "registrationCode": "123-4",
            "amount": 150.0,
            "totalValue": 300.0,
            "dueDate": "2025-03-20"
        }"#;
        let row: RecordRow = serde_json::from_str(json).unwrap();

        match StoredRow::from(row) {
            StoredRow::Record(record) => {
                assert_eq!(record.id, Some(RecordId("7".to_string())));
                assert_eq!(record.registration_code, "123-4");
                assert_eq!(record.total_value, 300.0);
                assert_eq!(record.due_date, NaiveDate::from_ymd_opt(2025, 3, 20));
                assert!(record.meter_id.is_empty());
            }
            StoredRow::Pending(_) => panic!("expected a record"),
        }
    }
}
