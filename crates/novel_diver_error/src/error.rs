//! Top-level error wrapper types.

use crate::{
    ConfigError, GenerationError, JsonError, SessionError, StorageError, ValidationError,
};

/// Every failure the engine can surface, by concern.
///
/// # Examples
///
/// ```
/// use novel_diver_error::{NovelDiverError, SessionError, SessionErrorKind};
///
/// let err: NovelDiverError = SessionError::new(SessionErrorKind::NoCharacter).into();
/// assert!(format!("{}", err).contains("Novel Diver Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum NovelDiverErrorKind {
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Story storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Story generation error
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Character validation error
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Session lifecycle error
    #[from(SessionError)]
    Session(SessionError),
}

/// Novel Diver error with kind discrimination.
///
/// # Examples
///
/// ```
/// use novel_diver_error::{NovelDiverResult, ConfigError};
///
/// fn might_fail() -> NovelDiverResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Novel Diver Error: {}", _0)]
pub struct NovelDiverError(Box<NovelDiverErrorKind>);

impl NovelDiverError {
    /// Create a new error from a kind.
    pub fn new(kind: NovelDiverErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &NovelDiverErrorKind {
        &self.0
    }

    /// The generation failure behind this error, if it is one.
    pub fn as_generation(&self) -> Option<&GenerationError> {
        match self.kind() {
            NovelDiverErrorKind::Generation(err) => Some(err),
            _ => None,
        }
    }
}

impl<T> From<T> for NovelDiverError
where
    T: Into<NovelDiverErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Novel Diver operations.
pub type NovelDiverResult<T> = std::result::Result<T, NovelDiverError>;
