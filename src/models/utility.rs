use serde::{Deserialize, Serialize};
use std::fmt;

/// Utility feed the wizard is collecting bills for
///
/// The key doubles as the `<feature>` segment of the cursor key, so each feed
/// keeps its own progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilityKind {
    /// Água
    Water,
    /// Energia elétrica
    Energy,
    /// Telefonia fixa
    FixedLine,
    /// Telefonia móvel
    Mobile,
}

impl UtilityKind {
    /// Storage key
    pub fn key(self) -> &'static str {
        match self {
            UtilityKind::Water => "agua",
            UtilityKind::Energy => "energia",
            UtilityKind::FixedLine => "telefonia_fixa",
            UtilityKind::Mobile => "telefonia_movel",
        }
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            UtilityKind::Water => "Água",
            UtilityKind::Energy => "Energia",
            UtilityKind::FixedLine => "Telefonia Fixa",
            UtilityKind::Mobile => "Telefonia Móvel",
        }
    }

    /// Parse from a key or a common alias
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "agua" | "água" | "water" => Some(UtilityKind::Water),
            "energia" | "luz" | "energy" => Some(UtilityKind::Energy),
            "telefonia_fixa" | "fixa" | "fixed_line" => Some(UtilityKind::FixedLine),
            "telefonia_movel" | "movel" | "móvel" | "mobile" => Some(UtilityKind::Mobile),
            _ => None,
        }
    }
}

impl fmt::Display for UtilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
