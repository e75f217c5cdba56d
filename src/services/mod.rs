pub mod cursor_store;
pub mod prior_period;
pub mod roster_loader;

pub use cursor_store::CursorStore;
pub use prior_period::{PriorPeriodResolver, ResolvedState};
pub use roster_loader::RosterLoader;
