use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the ActivityWatch JSON tools.
#[derive(Error, Debug)]
pub enum AwError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Invalid JSON input - {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A timestamp string could not be parsed as an instant.
    #[error("Invalid timestamp format: {0}")]
    TimestampParse(String),

    /// An event lacks the `timestamp` field on a code path that requires it.
    #[error("Event has no timestamp")]
    MissingTimestamp,

    /// A timestamp string is too short to carry day/hour grouping keys.
    #[error("Malformed timestamp: {0}")]
    MalformedTimestamp(String),

    /// A date argument did not match any recognised format.
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// The `--start` date is later than the `--end` date.
    #[error("Start date must be before or equal to end date")]
    StartAfterEnd,

    /// The `--directory` argument does not name a directory.
    #[error("'{0}' is not a valid directory")]
    NotADirectory(PathBuf),

    /// A directory contained no `*.json` files to process.
    #[error("No JSON files found in {0}")]
    NoJsonFiles(PathBuf),

    /// An input file and `--directory` were both given.
    #[error("Cannot specify both input file and directory")]
    InputConflict,

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the toolkit crates.
pub type Result<T> = std::result::Result<T, AwError>;
