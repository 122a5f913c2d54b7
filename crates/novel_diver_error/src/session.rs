//! Story session lifecycle errors.

/// Operations attempted in a session state that does not allow them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SessionErrorKind {
    /// A story was started before a character was set
    #[display("No character has been created yet")]
    NoCharacter,
    /// A choice was made before any story was started
    #[display("No story is in progress")]
    NoStory,
    /// The newest chunk offers no options to choose from
    #[display("The current chapter has no decision options")]
    NoOptions,
    /// The chosen index is outside the offered options
    #[display("Invalid choice {} (expected 0..{})", index, available)]
    InvalidChoice {
        /// The index that was chosen
        index: usize,
        /// How many options were offered
        available: usize,
    },
    /// A different option was already recorded for the newest chunk
    #[display("Option {} was already chosen for this chapter; retry it or restart", recorded)]
    DecisionPending {
        /// Index of the decision already recorded
        recorded: usize,
    },
    /// Retry was requested but no decision is waiting on a continuation
    #[display("There is no failed action to retry")]
    NothingToRetry,
}

/// Session error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Session Error: {} at line {} in {}", kind, line, file)]
pub struct SessionError {
    /// The kind of error that occurred
    pub kind: SessionErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SessionError {
    /// Create a new session error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SessionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
