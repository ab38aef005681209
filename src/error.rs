//! Error types for grid parsing, validation and calibration-table loading

use std::path::PathBuf;

/// Text that does not match `<letter><major 1-2 digits>[K<keypad digits>]`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("bad grid reference `{input}`: {reason}")]
pub struct ParseError {
    pub input: String,
    pub reason: &'static str,
}

impl ParseError {
    pub(crate) fn new(input: &str, reason: &'static str) -> Self {
        ParseError {
            input: input.to_string(),
            reason,
        }
    }
}

/// Well-formed reference whose parts are out of range
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("keypads must be in the range 1-9, got {value}")]
    KeypadOutOfRange { value: u8 },
    #[error("grid letter must be A-Z, got `{letter}`")]
    LetterOutOfRange { letter: char },
}

/// Failure to load a calibration table
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("cannot read calibration table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed calibration record: {0}")]
    Csv(#[from] csv::Error),
    #[error("calibration table has {distances} distances but {mils} mils values")]
    LengthMismatch { distances: usize, mils: usize },
    #[error("calibration table needs a header row (e.g. `distance,mils`)")]
    MissingHeader,
    #[error("calibration table needs at least 2 points, got {0}")]
    TooFewPoints(usize),
    #[error("calibration distances must be strictly increasing (at row {row})")]
    NotIncreasing { row: usize },
    #[error("calibration value is not finite (at row {row})")]
    NonFinite { row: usize },
}

/// Any failure surfaced by the targeting core
#[derive(Debug, thiserror::Error)]
pub enum TargetingError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Table(#[from] TableError),
}

impl TargetingError {
    /// True for malformed text, false for semantic or table failures
    pub fn is_parse(&self) -> bool {
        matches!(self, TargetingError::Parse(_))
    }

    pub fn is_grid(&self) -> bool {
        matches!(self, TargetingError::Grid(_))
    }
}
