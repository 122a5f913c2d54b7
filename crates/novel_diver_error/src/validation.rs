//! Character validation errors.

use std::fmt;

/// Every rule a character failed, in the order the rules were checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Human readable issue descriptions
    pub issues: Vec<String>,
    /// Line number where the error was created
    pub line: u32,
    /// File where the error was created
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new validation error with automatic location tracking.
    #[track_caller]
    pub fn new(issues: Vec<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            issues,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Validation Error: {} at line {} in {}",
            self.issues.join("; "),
            self.line,
            self.file
        )
    }
}

impl std::error::Error for ValidationError {}
