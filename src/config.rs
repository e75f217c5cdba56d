use std::path::PathBuf;

use crate::error::ConfigError;
use crate::models::{Period, UtilityKind};

/// Program configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Utility feed being entered
    pub utility: UtilityKind,
    /// Active period
    pub period: Period,
    /// School directory (TOML)
    pub directory_file: PathBuf,
    /// Monthly records (JSON)
    pub records_file: PathBuf,
    /// Session storage holding the cursor (JSON)
    pub session_file: PathBuf,
    /// Debug-level logs
    pub verbose_logging: bool,
    /// Session summary log
    pub output_log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            utility: UtilityKind::Water,
            period: Period::current(),
            directory_file: PathBuf::from("escolas.toml"),
            records_file: PathBuf::from("registros.json"),
            session_file: PathBuf::from("sessao.json"),
            verbose_logging: false,
            output_log_file: PathBuf::from("lancamento.log"),
        }
    }
}

impl Config {
    /// Read `WIZARD_*` environment variables over the defaults
    ///
    /// Unset variables keep their default; a set but unparseable one is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Config::from_env`] with an injectable variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default = Self::default();
        Ok(Self {
            utility: parse_var(&lookup, "WIZARD_UTILITY", "utility kind", UtilityKind::from_str)?
                .unwrap_or(default.utility),
            period: parse_var(&lookup, "WIZARD_PERIOD", "period (e.g. Janeiro/2025)", |v| {
                v.parse().ok()
            })?
            .unwrap_or(default.period),
            directory_file: lookup("WIZARD_DIRECTORY_FILE")
                .map(PathBuf::from)
                .unwrap_or(default.directory_file),
            records_file: lookup("WIZARD_RECORDS_FILE")
                .map(PathBuf::from)
                .unwrap_or(default.records_file),
            session_file: lookup("WIZARD_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or(default.session_file),
            verbose_logging: parse_var(&lookup, "VERBOSE_LOGGING", "bool", |v| v.parse().ok())?
                .unwrap_or(default.verbose_logging),
            output_log_file: lookup("OUTPUT_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or(default.output_log_file),
        })
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var_name: &str,
    expected_type: &str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<Option<T>, ConfigError> {
    let Some(value) = lookup(var_name) else {
        return Ok(None);
    };
    parse(value.trim())
        .map(Some)
        .ok_or_else(|| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value,
            expected_type: expected_type.to_string(),
        })
}
