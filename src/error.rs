use thiserror::Error;

/// Boxed source error carried by the component errors
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Roster could not be loaded
    #[error("roster error: {0}")]
    Load(#[from] LoadError),
    /// Commit was rejected or failed
    #[error("commit error: {0}")]
    Commit(#[from] CommitError),
    /// Skip was rejected or failed
    #[error("skip error: {0}")]
    Skip(#[from] SkipError),
    /// Backward navigation was rejected
    #[error("navigation error: {0}")]
    Navigation(#[from] NavigationError),
    /// Configuration error
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// Period label could not be parsed
    #[error("period error: {0}")]
    Period(#[from] PeriodParseError),
}

/// Roster load errors
///
/// Fatal for the session: the wizard falls back to its empty-roster state.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Directory collaborator failed
    #[error("school directory unreachable: {source}")]
    Unreachable {
        #[source]
        source: BoxError,
    },
    /// Directory returned an unusable entry
    #[error("malformed school entry at position {position}: {reason}")]
    Malformed { position: usize, reason: String },
}

/// Prior-period lookup errors
///
/// Never surfaced: the resolver logs them and falls back to an empty form.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("lookup of {school} for {period} failed: {source}")]
    Lookup {
        school: String,
        period: String,
        #[source]
        source: BoxError,
    },
}

/// Commit errors, the only ones shown to the user
#[derive(Debug, Error)]
pub enum CommitError {
    /// Wizard is not showing a school
    #[error("nothing to commit while {state}")]
    NotViewing { state: &'static str },
    /// First cadastro has no registration code
    #[error("registration code of the first cadastro is required ({school})")]
    MissingRegistrationCode { school: String },
    /// Registration code collides with the pending marker stored in the file
    #[error("registration code '{code}' is reserved for pending schools ({school})")]
    ReservedRegistrationCode { school: String, code: String },
    /// Record store failed
    #[error("failed to save {school} for {period}: {source}")]
    Persist {
        school: String,
        period: String,
        #[source]
        source: BoxError,
    },
}

/// Skip errors
#[derive(Debug, Error)]
pub enum SkipError {
    /// Wizard is not showing a school
    #[error("nothing to skip while {state}")]
    NotViewing { state: &'static str },
    /// School is already filled and locked
    #[error("{school} is already filled; request edit before skipping")]
    NotAllowed { school: String },
    /// Record store failed; logged only, the wizard advances anyway
    #[error("failed to mark {school} pending for {period}: {source}")]
    Persist {
        school: String,
        period: String,
        #[source]
        source: BoxError,
    },
}

/// Navigation errors
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("cannot navigate while {state}")]
    NotViewing { state: &'static str },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable could not be parsed
    #[error("environment variable {var_name}: value '{value}' is not a valid {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

/// Period label errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodParseError {
    #[error("period '{0}' must look like 'Janeiro/2025'")]
    MissingSeparator(String),
    #[error("unknown month '{0}'")]
    UnknownMonth(String),
    #[error("invalid year '{0}'")]
    InvalidYear(String),
}

// ========== convenience constructors ==========

impl LoadError {
    pub fn unreachable(source: impl Into<BoxError>) -> Self {
        LoadError::Unreachable {
            source: source.into(),
        }
    }
}

impl CommitError {
    pub fn persist(
        school: impl Into<String>,
        period: impl ToString,
        source: impl Into<BoxError>,
    ) -> Self {
        CommitError::Persist {
            school: school.into(),
            period: period.to_string(),
            source: source.into(),
        }
    }
}

impl SkipError {
    pub fn persist(
        school: impl Into<String>,
        period: impl ToString,
        source: impl Into<BoxError>,
    ) -> Self {
        SkipError::Persist {
            school: school.into(),
            period: period.to_string(),
            source: source.into(),
        }
    }
}

impl ResolveError {
    pub fn lookup(
        school: impl Into<String>,
        period: impl ToString,
        source: impl Into<BoxError>,
    ) -> Self {
        ResolveError::Lookup {
            school: school.into(),
            period: period.to_string(),
            source: source.into(),
        }
    }
}

/// Application result type
pub type AppResult<T> = Result<T, AppError>;
