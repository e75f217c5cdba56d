use serde::{Deserialize, Serialize};

/// School registry entry
///
/// Owned by the external registry; the wizard only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub neighborhood: String,
    #[serde(default)]
    pub macroregion: String,
    #[serde(default)]
    pub school_type: String,
}

impl School {
    /// School with only identity fields set
    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            owner: String::new(),
            address: String::new(),
            number: String::new(),
            neighborhood: String::new(),
            macroregion: String::new(),
            school_type: String::new(),
        }
    }
}
