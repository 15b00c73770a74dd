/*!
 * Error types for the hansub engine.
 *
 * Edit commands fail synchronously with an `EditError`; importing foreign
 * subtitle text fails with an `ImportError`. Both are wrapped by `AppError`
 * for application-level code, using the thiserror crate for the definitions.
 */

use thiserror::Error;

/// Errors raised by timeline edit commands and the exporter.
///
/// None of these are retryable: callers are expected to validate ids against
/// the timeline before issuing a command.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    /// No entry with the given id exists in the timeline
    #[error("Subtitle entry not found: {0}")]
    EntryNotFound(String),

    /// A merge was requested with fewer than two entries
    #[error("Merge requires at least 2 entries, got {given}")]
    InsufficientEntries {
        /// Number of ids supplied
        given: usize,
    },

    /// The split offset lies outside the entry text or leaves an empty half
    #[error("Invalid split offset {offset} for entry {id} (text length {len})")]
    InvalidSplitOffset {
        /// Entry id
        id: String,
        /// Requested character offset
        offset: usize,
        /// Text length in characters
        len: usize,
    },

    /// The requested export format is not known
    #[error("Unsupported export format: {0}")]
    UnsupportedExportFormat(String),

    /// A text edit would leave the entry empty
    #[error("Subtitle text for entry {0} cannot be empty")]
    EmptyText(String),

    /// A derived or imported id is already taken
    #[error("Duplicate subtitle entry id: {0}")]
    DuplicateEntryId(String),

    /// An operation would produce start >= end
    #[error("Invalid time range: start {start_ms}ms >= end {end_ms}ms")]
    InvalidTimeRange {
        /// Start time in ms
        start_ms: u64,
        /// End time in ms
        end_ms: u64,
    },
}

/// Errors that can occur while importing subtitle text
#[derive(Error, Debug)]
pub enum ImportError {
    /// A timestamp line could not be parsed
    #[error("Invalid timestamp at block {block}: {line}")]
    InvalidTimestamp {
        /// 1-based block number
        block: usize,
        /// Offending line
        line: String,
    },

    /// JSON input did not match the export schema
    #[error("Failed to parse JSON subtitles: {0}")]
    Json(#[from] serde_json::Error),

    /// Parsed entries violate a timeline invariant
    #[error("Imported entries are invalid: {0}")]
    Invalid(#[from] EditError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from an edit command
    #[error("Edit error: {0}")]
    Edit(#[from] EditError),

    /// Error from importing subtitles
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

/// Result alias for edit commands
pub type EditResult<T> = std::result::Result<T, EditError>;
