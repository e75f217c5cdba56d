//! Orchestration layer
//!
//! ## Modules
//!
//! ### `wizard` - monthly batch entry wizard
//! - walks the roster one school at a time for one period
//! - commit / skip / previous transitions
//! - cursor persistence ordering and the closing callback
//!
//! ### `session` - CLI session
//! - wires the file-backed adapters from `Config`
//! - reads commands from stdin, renders the current school
//! - prints the session summary
//!
//! ## Layering
//!
//! ```text
//! session (stdin, files, Ctrl-C)
//!     ↓
//! wizard (state machine over the roster)
//!     ↓
//! workflow::EntryForm (one school's form)
//!     ↓
//! services (roster loader / cursor store / prior-period resolver)
//!     ↓
//! ports ← infrastructure (toml / json / memory adapters)
//! ```

pub mod session;
pub mod wizard;

pub use session::{App, Command};
pub use wizard::{CloseCallback, SessionStats, Step, Wizard, WizardState, EMPTY_ROSTER_MESSAGE};
