//! Generation error taxonomy.
//!
//! Providers do not report structured error codes uniformly, so the kind of a
//! failure is recovered from the provider's message text.

/// Case-insensitive substrings that mark a message as a rate-limit signal.
pub const RATE_LIMIT_INDICATORS: [&str; 4] = ["rate limit", "429", "quota", "too many requests"];

const AUTHENTICATION_INDICATORS: [&str; 6] = [
    "api key not valid",
    "api_key_invalid",
    "invalid api key",
    "incorrect api key",
    "401",
    "unauthorized",
];

const PERMISSION_INDICATORS: [&str; 3] = ["403", "permission", "forbidden"];

/// Returns true if the message carries one of the [`RATE_LIMIT_INDICATORS`].
///
/// # Examples
///
/// ```
/// use novel_diver_error::is_rate_limit_message;
///
/// assert!(is_rate_limit_message("HTTP 429: Too Many Requests"));
/// assert!(is_rate_limit_message("Resource has been exhausted (e.g. check QUOTA)."));
/// assert!(!is_rate_limit_message("connection reset by peer"));
/// ```
pub fn is_rate_limit_message(message: &str) -> bool {
    let lowered = message.to_lowercase();
    RATE_LIMIT_INDICATORS
        .iter()
        .any(|indicator| lowered.contains(indicator))
}

/// Reasons a story generation call can fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GenerationErrorKind {
    /// No backend could be initialized
    #[display("Story engine unavailable: no generation backend could be initialized")]
    Unavailable,
    /// Credential rejected by the provider
    #[display("Authentication failed: {}", _0)]
    Authentication(String),
    /// Quota exhausted or rate limited
    #[display("Quota exceeded or rate limited: {}", _0)]
    Quota(String),
    /// Credential lacks access to the requested resource
    #[display("Permission denied: {}", _0)]
    Permission(String),
    /// Anything the classifier does not recognise
    #[display("Generation failed: {}", _0)]
    Unknown(String),
}

impl GenerationErrorKind {
    /// Classify a raw provider message.
    ///
    /// Authentication wins over quota, which wins over permission.
    ///
    /// # Examples
    ///
    /// ```
    /// use novel_diver_error::GenerationErrorKind;
    ///
    /// let kind = GenerationErrorKind::classify("400 API key not valid. Please pass a valid API key.");
    /// assert!(matches!(kind, GenerationErrorKind::Authentication(_)));
    ///
    /// let kind = GenerationErrorKind::classify("bad response from server; code 429");
    /// assert!(matches!(kind, GenerationErrorKind::Quota(_)));
    /// ```
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        let lowered = message.to_lowercase();
        let matches_any = |indicators: &[&str]| indicators.iter().any(|i| lowered.contains(i));

        if matches_any(&AUTHENTICATION_INDICATORS) {
            Self::Authentication(message)
        } else if matches_any(&RATE_LIMIT_INDICATORS) {
            Self::Quota(message)
        } else if matches_any(&PERMISSION_INDICATORS) {
            Self::Permission(message)
        } else {
            Self::Unknown(message)
        }
    }

    /// Only quota and rate-limit failures are worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Quota(_))
    }

    /// Short label for log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::Authentication(_) => "auth",
            Self::Quota(_) => "quota",
            Self::Permission(_) => "permission",
            Self::Unknown(_) => "unknown",
        }
    }

    /// Remediation text suitable for showing to the player.
    pub fn user_hint(&self) -> &'static str {
        match self {
            Self::Unavailable => "Configure an API key or enable demo mode, then try again.",
            Self::Authentication(_) => "Your API key is invalid or has expired. Update it and try again.",
            Self::Quota(_) => "Your API usage limit has been reached. Try again later or switch providers.",
            Self::Permission(_) => "Your API key doesn't have the required permissions. Check them or generate a new key.",
            Self::Unknown(_) => "This might be a temporary issue. Retry the last action.",
        }
    }
}

/// Generation error with source location tracking.
///
/// # Examples
///
/// ```
/// use novel_diver_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::Unavailable);
/// assert!(format!("{}", err).contains("unavailable"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Classify a provider message and wrap it.
    #[track_caller]
    pub fn from_message(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::classify(message))
    }

    /// Check if this error should be retried.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_provider_messages() {
        assert!(matches!(
            GenerationErrorKind::classify("API_KEY_INVALID"),
            GenerationErrorKind::Authentication(_)
        ));
        assert!(matches!(
            GenerationErrorKind::classify("HTTP 401 Unauthorized"),
            GenerationErrorKind::Authentication(_)
        ));
        assert!(matches!(
            GenerationErrorKind::classify("Too Many Requests"),
            GenerationErrorKind::Quota(_)
        ));
        assert!(matches!(
            GenerationErrorKind::classify("403 Forbidden"),
            GenerationErrorKind::Permission(_)
        ));
        assert!(matches!(
            GenerationErrorKind::classify("All HuggingFace models failed"),
            GenerationErrorKind::Unknown(_)
        ));
    }

    #[test]
    fn authentication_takes_precedence_over_quota() {
        let kind = GenerationErrorKind::classify("401 unauthorized (quota project not set)");
        assert!(matches!(kind, GenerationErrorKind::Authentication(_)));
    }

    #[test]
    fn classification_keeps_raw_message() {
        let kind = GenerationErrorKind::classify("429 rate limit");
        assert_eq!(kind, GenerationErrorKind::Quota("429 rate limit".to_string()));
        assert!(kind.is_retryable());
        assert!(!GenerationErrorKind::Permission("403".into()).is_retryable());
    }
}
