use crate::models::school::School;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Layout of the school directory TOML file
///
/// ```toml
/// [[schools]]
/// id = "42"
/// name = "EMEF Monteiro Lobato"
/// neighborhood = "Centro"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchoolDirectoryFile {
    #[serde(default)]
    pub schools: Vec<School>,
}

/// Load the school directory from a TOML file
pub async fn load_schools_from_toml(toml_file_path: &Path) -> Result<Vec<School>> {
    if !toml_file_path.exists() {
        anyhow::bail!("directory file not found: {}", toml_file_path.display());
    }

    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("failed to read directory file: {}", toml_file_path.display()))?;

    let directory: SchoolDirectoryFile = toml::from_str(&content)
        .with_context(|| format!("failed to parse directory file: {}", toml_file_path.display()))?;

    tracing::debug!(
        "loaded {} schools from {}",
        directory.schools.len(),
        toml_file_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
    );

    Ok(directory.schools)
}
