//! # Lançamento Mensal
//!
//! Monthly batch entry of utility bills (water, energy, fixed-line, mobile)
//! for municipal schools: a wizard that walks the school roster one school at
//! a time, remembers where the user stopped, and pre-fills each form from the
//! current or previous month.
//!
//! ## Architecture
//!
//! ### ① Ports & infrastructure
//! - `ports` - what the wizard needs from the outside: school directory,
//!   record store, session key-value store
//! - `infrastructure/` - TOML / JSON file adapters and in-memory adapters
//!
//! ### ② Services
//! - `RosterLoader` - fetch and order the schools
//! - `CursorStore` - per-period progress memory
//! - `PriorPeriodResolver` - filled / carried / empty
//!
//! ### ③ Workflow
//! - `EntryForm` - one school's cadastros, totals and edit lock
//! - `EntryCtx` - "which school, which period" for log lines
//!
//! ### ④ Orchestration
//! - `orchestrator/wizard` - commit / skip / previous state machine
//! - `orchestrator/session` - CLI driving the wizard over files

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod ports;
pub mod services;
pub mod utils;
pub mod workflow;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{CadastroEntry, CadastroField, Period, School, StoredRow, UtilityKind};
pub use orchestrator::{App, Step, Wizard, WizardState};
pub use services::{CursorStore, ResolvedState};
pub use workflow::EntryForm;
