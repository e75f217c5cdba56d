//! Billing period
//!
//! A period is a month of a year, labelled `"Janeiro/2025"`. The month table
//! is fixed; ordering follows the calendar (year first, then month).

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PeriodParseError;

/// Month names in calendar order
pub const MONTHS: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Billing period (month + year)
///
/// Field order matters: the derived `Ord` compares `year` before `month`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    /// 0-based index into [`MONTHS`]
    month: usize,
}

impl Period {
    /// Build a period from a 0-based month index
    ///
    /// # Returns
    /// `None` when `month` is not in `0..12`
    pub fn new(month: usize, year: i32) -> Option<Self> {
        (month < MONTHS.len()).then_some(Self { year, month })
    }

    /// Period containing the given date
    pub fn from_date(date: impl Datelike) -> Self {
        Self {
            year: date.year(),
            month: date.month0() as usize,
        }
    }

    /// Period of the local clock
    pub fn current() -> Self {
        Self::from_date(chrono::Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// 0-based month index
    pub fn month_index(&self) -> usize {
        self.month
    }

    pub fn month_name(&self) -> &'static str {
        MONTHS[self.month]
    }

    /// The immediately preceding period
    ///
    /// Wraps January back to December of the previous year.
    pub fn previous(&self) -> Self {
        let month = (self.month + MONTHS.len() - 1) % MONTHS.len();
        let year = if self.month == 0 {
            self.year - 1
        } else {
            self.year
        };
        Self { year, month }
    }

    /// Label used as storage key, e.g. `"Janeiro/2025"`
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month_name(), self.year)
    }
}

impl FromStr for Period {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (month_name, year) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| PeriodParseError::MissingSeparator(s.to_string()))?;

        let month_name = month_name.trim();
        let month = MONTHS
            .iter()
            .position(|m| m.to_lowercase() == month_name.to_lowercase())
            .ok_or_else(|| PeriodParseError::UnknownMonth(month_name.to_string()))?;

        let year = year
            .trim()
            .parse::<i32>()
            .map_err(|_| PeriodParseError::InvalidYear(year.trim().to_string()))?;

        Ok(Self { year, month })
    }
}

impl TryFrom<String> for Period {
    type Error = PeriodParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.label()
    }
}
