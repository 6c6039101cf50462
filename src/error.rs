//! Errors recovered at the command boundary.
//!
//! Everything else (I/O, codecs, grammar setup) travels as `anyhow::Error`;
//! these are the failures an operator is expected to read and act on.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessedError {
    #[error("No file loaded. Please open a file first.")]
    NoFileLoaded,

    #[error("file not found: {path}")]
    FileNotFound { path: String },

    #[error("{path} is not valid UTF-8 text; refusing to edit it")]
    NotUtf8 { path: String },

    #[error("file already exists: {path}")]
    FileAlreadyExists { path: String },

    #[error(
        "Invalid range: {input}\nRange must be one of the following:\n  N: e.g. 10\n  M-N: e.g. 30-45"
    )]
    InvalidRange { input: String },

    #[error("Error compiling regex: {0}")]
    RegexCompile(#[from] regex::Error),

    #[error("You must select a range before replacing it.")]
    NoSelectionPending,

    /// `report` is the rendered diagnostics, ready for the operator.
    #[error("{report}")]
    SyntaxRejected { report: String },

    #[error("Cannot scroll.  Use search or list to display something first.")]
    CannotScroll,

    #[error("no matches found")]
    NoMatches,

    #[error("No source index found. Run `sessed init` first.")]
    IndexMissing,

    #[error("Nothing found for {kind} {name}; try using grep.")]
    SymbolNotFound { kind: String, name: String },

    #[error("SESSED_STATE_DIR is not set; pass --state-dir or export it")]
    StateDirUnset,
}

/// Where a failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl SessedError {
    pub fn invalid_range(input: impl Into<String>) -> Self {
        Self::InvalidRange {
            input: input.into(),
        }
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Informational outcomes go to stdout alongside regular output, the rest
    /// to stderr.
    pub fn stream(&self) -> Stream {
        match self {
            Self::CannotScroll | Self::NoMatches | Self::SyntaxRejected { .. } => Stream::Stdout,
            _ => Stream::Stderr,
        }
    }
}
