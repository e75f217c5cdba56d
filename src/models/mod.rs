pub mod cadastro;
pub mod loaders;
pub mod period;
pub mod record;
pub mod school;
pub mod utility;

pub use cadastro::{CadastroEntry, CadastroField};
pub use loaders::{load_schools_from_toml, SchoolDirectoryFile};
pub use period::{Period, MONTHS};
pub use record::{PendingMarker, Record, RecordId, RecordRow, StoredRow, PENDING_SENTINEL};
pub use school::School;
pub use utility::UtilityKind;
