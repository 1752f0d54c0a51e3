use std::path::PathBuf;

/// Fatal errors: raised before any comparison is scheduled.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read manifest {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed manifest line {line}: expected 2 paths, found {fields}")]
    ManifestLine { line: usize, fields: usize },

    #[error("Failed to parse config file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Invalid worker count: must be at least 1")]
    InvalidWorkers,
}

pub type Result<T> = std::result::Result<T, Error>;

/// Why a source file could not be turned into a syntax tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("syntax error at line {line}, column {column}")]
    Syntax { line: usize, column: usize },

    #[error("grammar unavailable: {0}")]
    Grammar(String),

    #[error("parser produced no tree")]
    Aborted,
}

/// Per-pair failure. Recorded in that pair's report; never aborts a batch.
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse { path: PathBuf, source: ParseError },

    #[error("Comparison exceeded {limit_ms}ms")]
    Timeout { limit_ms: u64 },
}

impl CompareError {
    /// Short machine-readable tag for reports.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Read { .. } => "read",
            Self::Parse { .. } => "parse",
            Self::Timeout { .. } => "timeout",
        }
    }
}
