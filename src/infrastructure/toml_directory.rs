use anyhow::Result;
use std::path::PathBuf;

use crate::models::{load_schools_from_toml, School};
use crate::ports::SchoolDirectory;

/// School directory read from a TOML file on every call
pub struct TomlSchoolDirectory {
    path: PathBuf,
}

impl TomlSchoolDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SchoolDirectory for TomlSchoolDirectory {
    async fn list_schools(&self) -> Result<Vec<School>> {
        load_schools_from_toml(&self.path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_reads_schools_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("escolas.toml");
        std::fs::write(
            &path,
            r#"
[[schools]]
id = "2"
name = "EMEF Zumbi dos Palmares"
neighborhood = "Vila Nova"
schoolType = "EMEF"

[[schools]]
id = "1"
name = "CMEI Aurora"
"#,
        )
        .unwrap();

        let schools = TomlSchoolDirectory::new(&path).list_schools().await.unwrap();
        assert_eq!(schools.len(), 2);
        assert_eq!(schools[0].name, "EMEF Zumbi dos Palmares");
        assert_eq!(schools[0].school_type, "EMEF");
        assert!(schools[1].owner.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let directory = TomlSchoolDirectory::new(dir.path().join("ausente.toml"));
        assert!(directory.list_schools().await.is_err());
    }
}
