//! Helpers shared by unit tests

use crate::models::{Period, Record, School};

/// Minimal record with a registration code and one amount
pub fn record(school: &str, period: Period, registration_code: &str) -> Record {
    Record {
        id: None,
        school: school.to_string(),
        period,
        registration_code: registration_code.to_string(),
        meter_id: String::new(),
        consumption: None,
        billing_days: None,
        previous_reading: None,
        current_reading: None,
        due_date: None,
        amount: 0.0,
        withholding_tax: None,
        installation_type: String::new(),
        used_by: String::new(),
        total_value: 0.0,
        service_description: String::new(),
        pending_notes: String::new(),
    }
}

/// Schools named "Escola 0".."Escola n-1"
pub fn schools(n: usize) -> Vec<School> {
    (0..n)
        .map(|i| School::named(i.to_string(), format!("Escola {}", i)))
        .collect()
}
