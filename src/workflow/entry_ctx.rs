//! Entry context
//!
//! Wraps "which school of the roster, for which period" for log lines

use std::fmt::Display;

use crate::models::Period;

/// Entry context
#[derive(Debug, Clone)]
pub struct EntryCtx {
    pub period: Period,

    /// 0-based roster index
    pub index: usize,

    /// Roster length
    pub total: usize,

    pub school: String,
}

impl EntryCtx {
    pub fn new(period: Period, index: usize, total: usize, school: impl Into<String>) -> Self {
        Self {
            period,
            index,
            total,
            school: school.into(),
        }
    }
}

impl Display for EntryCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[escola {}/{} {} | {}]",
            self.index + 1,
            self.total,
            self.school,
            self.period
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_one_based() {
        let ctx = EntryCtx::new("Maio/2025".parse().unwrap(), 0, 12, "EMEF Alfa");
        assert_eq!(ctx.to_string(), "[escola 1/12 EMEF Alfa | Maio/2025]");
    }
}
