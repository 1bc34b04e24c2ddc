//! Error types for the transfer engine.
//!
//! The primary error type is `EngineError`, which represents run-level
//! failures: bad configuration, pipeline stages invoked out of order,
//! destination directory creation, and report output. Per-file transfer
//! failures are not represented here: they are logged as warnings at the
//! point of the attempt, counted in `TransferStats`, and the run
//! continues.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::RunState;
use crate::naming::supported_tokens;

/// Errors that abort a run.
///
/// Configuration errors are raised before any filesystem side effect so a
/// bad invocation never partially completes a batch. Report errors are
/// fatal because the report is the product of the run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The input file list was empty.
    #[error("no input files supplied")]
    NoInputFiles,

    /// The requested algorithm list was empty.
    #[error("no digest algorithms requested")]
    NoAlgorithms,

    /// An algorithm token outside the supported set was requested.
    #[error("unsupported digest algorithm '{token}' (supported: {})", supported_tokens())]
    UnsupportedAlgorithm { token: String },

    /// A pipeline stage was invoked out of order.
    #[error("run must be in the {expected:?} state (currently {actual:?})")]
    InvalidState { expected: RunState, actual: RunState },

    /// A source file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    ReadError { path: PathBuf, source: io::Error },

    /// A destination file could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    WriteError { path: PathBuf, source: io::Error },

    /// A file could not be moved to its destination.
    #[error("failed to move {} to {}: {source}", .from.display(), .to.display())]
    MoveError {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    /// The destination directory could not be created.
    #[error("failed to create directory {}: {source}", .path.display())]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    /// A report file could not be written.
    #[error("failed to write report {}: {source}", .path.display())]
    ReportWrite { path: PathBuf, source: io::Error },

    /// The report table could not be encoded in the requested format.
    #[error("failed to encode {format} report: {message}")]
    ReportEncode { format: String, message: String },
}
