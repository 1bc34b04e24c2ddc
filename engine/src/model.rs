//! Core data model for hash-rename runs.
//!
//! This module defines the main data structures for one run of the tool:
//! - Ledger: the in-memory table of per-file metadata and computed names
//! - FileEntry: a single input file within a run (one table row)
//! - HashColumn: the hash-derived filenames for one algorithm, one per row
//! - Mode, RunState: enums controlling behavior
//! - TransferStats: per-run outcome counts

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::naming::DigestAlgorithm;

/// The in-memory table for a single run.
///
/// A Ledger encompasses:
/// - The operation mode and the requested digest algorithms
/// - One `FileEntry` row per input path, in input order
/// - One `HashColumn` per distinct requested algorithm
/// - The pipeline state, advanced by the stage functions in [`crate::run`]
///
/// The ledger is owned exclusively by the run that creates it and is never
/// persisted directly; `finalize` consumes it into a [`crate::report::Report`].
#[derive(Debug)]
pub struct Ledger {
    /// Unique identifier for this run (log correlation only)
    pub id: Uuid,

    /// Operation mode: Copy or Move, fixed for the whole run
    pub mode: Mode,

    /// Requested digest algorithms, in request order, duplicates preserved
    pub algorithms: Vec<DigestAlgorithm>,

    /// One row per input path
    pub entries: Vec<FileEntry>,

    /// One column per distinct requested algorithm, first-occurrence order
    pub columns: Vec<HashColumn>,

    /// Current pipeline state
    pub state: RunState,

    /// When the run was created
    pub created_at: DateTime<Utc>,
}

impl Ledger {
    /// Look up the hash column for an algorithm, if it has been assigned.
    pub fn column(&self, algorithm: DigestAlgorithm) -> Option<&HashColumn> {
        self.columns.iter().find(|c| c.algorithm == algorithm)
    }

    /// True when every hash column holds exactly one name per row.
    pub fn is_aligned(&self) -> bool {
        self.columns.iter().all(|c| c.names.len() == self.entries.len())
    }
}

/// A single input file within a run.
///
/// `parent_path`, `stem` and `suffix` are working fields for the hashing
/// stage; they are dropped when the ledger is finalized and never appear
/// in the emitted report.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Row index, equal to the position in the input enumeration
    pub index: usize,

    /// Basename including the original extension
    pub filename: String,

    /// Directory portion of the input path as written (transient)
    pub parent_path: String,

    /// Filename without the final extension (transient)
    pub stem: String,

    /// Final extension including the leading dot, or empty (transient)
    pub suffix: String,

    /// Resolved source directory
    pub source_dir: PathBuf,

    /// Resolved destination directory (equals `source_dir` for in-place runs)
    pub dest_dir: PathBuf,
}

impl FileEntry {
    /// Full path of the source file.
    pub fn source_path(&self) -> PathBuf {
        self.source_dir.join(&self.filename)
    }

    /// Full path of the destination file for one hash-derived name.
    pub fn dest_path(&self, hash_name: &str) -> PathBuf {
        self.dest_dir.join(hash_name)
    }
}

/// The hash-derived filenames computed under one algorithm, one per row.
#[derive(Debug, Clone)]
pub struct HashColumn {
    /// The algorithm this column was computed under
    pub algorithm: DigestAlgorithm,

    /// Hash-derived filename for every row, indexed by `FileEntry::index`
    pub names: Vec<String>,
}

/// The operation mode for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Copy files; sources remain in place
    Copy,
    /// Rename files; each source exists once afterwards, under its hash name
    Move,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Copy => write!(f, "copy"),
            Mode::Move => write!(f, "move"),
        }
    }
}

/// The pipeline state of a run.
///
/// Stages advance strictly in declaration order; each stage function
/// validates the state it requires. The states after `Transferred` are
/// realized by ownership: `finalize` consumes the ledger, so nothing can
/// run out of order past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Created, no rows collected yet
    Empty,
    /// Rows collected, no hash columns yet
    MetadataCollected,
    /// Hash columns assigned, transfers not executed
    HashesAssigned,
    /// Transfers executed (some attempts may have failed)
    Transferred,
}

/// Outcome counts for the transfer stage.
///
/// One attempt is one (row, hash column) pair in copy mode, or one row in
/// move mode. Failures are logged at the attempt; no per-attempt flags are
/// kept in the ledger.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransferStats {
    /// Total transfer attempts
    pub attempted: usize,
    /// Attempts that completed a filesystem operation
    pub completed: usize,
    /// Attempts skipped as no-ops (source and destination identical)
    pub skipped: usize,
    /// Attempts that failed and were logged
    pub failed: usize,
}
