pub mod toml_loader;

pub use toml_loader::{load_schools_from_toml, SchoolDirectoryFile};
