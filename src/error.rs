use crate::domain::CountryCode;

/// Application-level error: a message plus the process exit code it maps to.
///
/// Exit codes: 2 = configuration/CLI, 3 = empty data, 4 = fetch/parse.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Errors raised by the core stores and the map view.
///
/// These are deliberately precise so callers can distinguish "you asked for
/// something that was never ingested" from "nothing was ingested at all".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtlasError {
    /// The country code was never registered.
    UnknownCode(CountryCode),
    /// The display name was never registered.
    UnknownName(String),
    /// The series has no dates (nothing was ingested, or `finalize` was
    /// called on an empty builder).
    EmptyStore,
    /// A calendar date could not be formed from the given fields.
    InvalidDate(String),
}

impl std::fmt::Display for AtlasError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AtlasError::UnknownCode(code) => write!(f, "unknown country code '{code}'"),
            AtlasError::UnknownName(name) => write!(f, "unknown country name '{name}'"),
            AtlasError::EmptyStore => write!(f, "no dates ingested"),
            AtlasError::InvalidDate(s) => write!(f, "invalid date '{s}'"),
        }
    }
}

impl std::error::Error for AtlasError {}

impl From<AtlasError> for AppError {
    fn from(err: AtlasError) -> Self {
        let code = match err {
            AtlasError::EmptyStore => 3,
            _ => 4,
        };
        AppError::new(code, err.to_string())
    }
}
