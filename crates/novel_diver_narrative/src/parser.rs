//! Response parsing.
//!
//! Model output is free text. Parsing never fails: a response without the
//! delimiter or with too few options is repaired and the repair is reported as
//! a [`ParseRecovery`].

use derive_getters::Getters;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Literal token separating narrative from the numbered options.
pub const DECISION_DELIMITER: &str = "DECISION_POINT";

/// Exactly how many options every parsed segment carries.
pub const OPTION_COUNT: usize = 4;

/// Options used when the response has no delimiter at all.
pub const FALLBACK_OPTIONS: [&str; OPTION_COUNT] = [
    "Continue cautiously",
    "Take a bold approach",
    "Seek more information",
    "Try a creative solution",
];

/// Options appended, in order, when fewer than four were recovered.
pub const PADDING_OPTIONS: [&str; OPTION_COUNT] = [
    "Take a different approach",
    "Wait and observe",
    "Act decisively",
    "Seek help from others",
];

static OPTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-4][.)]\s*(.+)").expect("Valid option regex"));

/// How the options of a parsed segment were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ParseRecovery {
    /// Exactly four options were found after the delimiter
    Complete,
    /// No delimiter; the whole text is narrative and the fallback options are used
    MissingDelimiter,
    /// Fewer than four options were found and padding filled the rest
    PaddedOptions {
        /// How many options the response actually provided
        recovered: usize,
    },
    /// More than four options were found and the extras dropped
    TruncatedOptions {
        /// How many options the response actually provided
        recovered: usize,
    },
}

/// Narrative text plus exactly four options.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ParsedSegment {
    /// Story text, trimmed
    narrative: String,
    /// The four decision options
    options: [String; OPTION_COUNT],
    /// Which recovery path produced the options
    recovery: ParseRecovery,
}

impl ParsedSegment {
    /// Split into narrative and options.
    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.narrative, Vec::from(self.options))
    }
}

/// Parse raw model output into narrative and exactly four options.
///
/// The text before the first delimiter is the narrative. Options are read from
/// the lines between the first delimiter and the next one (or the end), keeping
/// lines of the form `1. text` or `1) text` with numbers 1 to 4.
///
/// # Examples
///
/// ```
/// use novel_diver_narrative::{ParseRecovery, parse_response};
///
/// let parsed = parse_response("Hello\nDECISION_POINT\n1. A\n2. B\n3. C\n4. D");
/// assert_eq!(parsed.narrative(), "Hello");
/// assert_eq!(parsed.options(), &["A", "B", "C", "D"].map(String::from));
/// assert_eq!(*parsed.recovery(), ParseRecovery::Complete);
/// ```
pub fn parse_response(response: &str) -> ParsedSegment {
    let mut parts = response.split(DECISION_DELIMITER);
    let before = parts.next().unwrap_or_default();

    let Some(after) = parts.next() else {
        warn!(response_len = response.len(), "No decision delimiter, using fallback options");
        return ParsedSegment {
            narrative: response.trim().to_string(),
            options: FALLBACK_OPTIONS.map(String::from),
            recovery: ParseRecovery::MissingDelimiter,
        };
    };

    let recovered: Vec<String> = after
        .trim()
        .lines()
        .filter_map(|line| {
            OPTION_LINE
                .captures(line.trim())
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
        })
        .collect();

    let found = recovered.len();
    let recovery = match found {
        OPTION_COUNT => ParseRecovery::Complete,
        n if n < OPTION_COUNT => ParseRecovery::PaddedOptions { recovered: n },
        n => ParseRecovery::TruncatedOptions { recovered: n },
    };
    if recovery != ParseRecovery::Complete {
        warn!(recovered = found, %recovery, "Option count repaired");
    }

    let mut options = recovered
        .into_iter()
        .chain(PADDING_OPTIONS.iter().map(|s| s.to_string()))
        .take(OPTION_COUNT);
    let options: [String; OPTION_COUNT] =
        std::array::from_fn(|_| options.next().unwrap_or_default());

    debug!(options = found, "Parsed response");
    ParsedSegment {
        narrative: before.trim().to_string(),
        options,
        recovery,
    }
}
