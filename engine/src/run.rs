//! Run orchestration module.
//!
//! This module provides the main run lifecycle functions:
//! - Creating a ledger for a copy or move run
//! - Collecting path metadata for the input files
//! - Assigning hash-derived names
//! - Executing the transfers
//! - Finalizing the ledger into a report
//!
//! The stages are strictly sequential. Each one validates the ledger state
//! before touching it, so calling them out of order is an error rather than
//! silent corruption.

use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use crate::error::EngineError;
use crate::fs_ops;
use crate::model::{FileEntry, HashColumn, Ledger, Mode, RunState, TransferStats};
use crate::naming::{DigestAlgorithm, HashNamer};
use crate::report::Report;

fn check_state(ledger: &Ledger, expected: RunState) -> Result<(), EngineError> {
    if ledger.state != expected {
        return Err(EngineError::InvalidState {
            expected,
            actual: ledger.state,
        });
    }
    Ok(())
}

/// Create an empty ledger for a new run.
///
/// # Arguments
/// * `mode` - Copy or Move, fixed for the whole run
/// * `algorithms` - Digest algorithms to compute, in request order; repeats
///   are kept and collapse onto one column during hashing
///
/// # Errors
/// Returns `EngineError::NoAlgorithms` if the list is empty.
pub fn create_ledger(
    mode: Mode,
    algorithms: Vec<DigestAlgorithm>,
) -> Result<Ledger, EngineError> {
    if algorithms.is_empty() {
        return Err(EngineError::NoAlgorithms);
    }

    Ok(Ledger {
        id: Uuid::new_v4(),
        mode,
        algorithms,
        entries: Vec::new(),
        columns: Vec::new(),
        state: RunState::Empty,
        created_at: Utc::now(),
    })
}

/// Collect path metadata for every input file, in input order.
///
/// Decomposes each path into filename, parent, stem and suffix, resolves
/// the destination directory, and appends one ledger row per input with
/// sequential index values starting at 0. When `directory` is set it is
/// created recursively before any row is recorded.
///
/// Inputs are treated as literal path strings; the filesystem is not
/// consulted here, so nonexistent files surface later as per-file transfer
/// failures rather than aborting the batch.
///
/// # Errors
/// Returns `EngineError::NoInputFiles` for an empty input list and
/// `EngineError::DirectoryCreationFailed` if the destination directory
/// cannot be created. Both abort before any row is recorded.
pub fn collect_metadata(
    ledger: &mut Ledger,
    inputs: &[PathBuf],
    directory: Option<&Path>,
) -> Result<(), EngineError> {
    check_state(ledger, RunState::Empty)?;

    if inputs.is_empty() {
        return Err(EngineError::NoInputFiles);
    }

    if let Some(dir) = directory {
        fs_ops::ensure_dir_exists(dir)?;
    }

    for (index, input) in inputs.iter().enumerate() {
        let parts = fs_ops::decompose(input);
        let dest_dir = fs_ops::resolve_destination(&parts, directory);

        ledger.entries.push(FileEntry {
            index,
            filename: parts.filename,
            parent_path: parts.parent.display().to_string(),
            stem: parts.stem,
            suffix: parts.suffix,
            source_dir: parts.parent,
            dest_dir,
        });
    }

    tracing::debug!(files = ledger.entries.len(), "Collected metadata");
    ledger.state = RunState::MetadataCollected;
    Ok(())
}

/// Compute the hash-derived name for every (row, algorithm) pair.
///
/// Algorithms are processed in request order. A repeated algorithm
/// recomputes and overwrites its existing column, so the ledger ends up
/// with exactly one column per distinct algorithm.
///
/// # Errors
/// Returns `EngineError::InvalidState` if metadata has not been collected.
pub fn assign_hashes(ledger: &mut Ledger, namer: &HashNamer) -> Result<(), EngineError> {
    check_state(ledger, RunState::MetadataCollected)?;

    for algorithm in ledger.algorithms.clone() {
        let names: Vec<String> = ledger
            .entries
            .iter()
            .map(|entry| namer.hash_name(&entry.filename, &entry.suffix, algorithm))
            .collect();

        match ledger.columns.iter_mut().find(|c| c.algorithm == algorithm) {
            Some(column) => column.names = names,
            None => ledger.columns.push(HashColumn { algorithm, names }),
        }
    }

    tracing::debug!(columns = ledger.columns.len(), "Assigned hash names");
    ledger.state = RunState::HashesAssigned;
    Ok(())
}

/// Execute the filesystem operations the ledger describes.
///
/// Copy mode transfers every row once per hash column, producing one
/// physical output file per algorithm. Move mode renames each source to
/// the first requested algorithm's name only; extra algorithm columns are
/// recorded in the report but never touch the filesystem, and requesting
/// them triggers a warning.
///
/// Individual transfer failures are logged as warnings and counted; they
/// never abort the batch.
///
/// # Errors
/// Returns `EngineError::InvalidState` if hashes have not been assigned.
pub fn execute_transfers(ledger: &mut Ledger) -> Result<TransferStats, EngineError> {
    check_state(ledger, RunState::HashesAssigned)?;

    tracing::info!(
        files = ledger.entries.len(),
        algorithms = ledger.columns.len(),
        mode = %ledger.mode,
        "Executing transfers"
    );

    let mut stats = TransferStats::default();

    match ledger.mode {
        Mode::Copy => {
            for (row, entry) in ledger.entries.iter().enumerate() {
                for column in &ledger.columns {
                    let src = entry.source_path();
                    let dst = entry.dest_path(&column.names[row]);
                    stats.attempted += 1;

                    // Copying a file onto itself is a no-op, not a failure
                    if src == dst {
                        tracing::warn!(
                            path = %src.display(),
                            "Source and destination are identical; skipping"
                        );
                        stats.skipped += 1;
                        continue;
                    }

                    match fs_ops::copy_file_with_metadata(&src, &dst) {
                        Ok(bytes) => {
                            tracing::debug!(
                                source = %src.display(),
                                dest = %dst.display(),
                                bytes,
                                "Copied file"
                            );
                            stats.completed += 1;
                        }
                        Err(e) => {
                            tracing::warn!(
                                error = %e,
                                source = %src.display(),
                                dest = %dst.display(),
                                "Copy failed; continuing"
                            );
                            stats.failed += 1;
                        }
                    }
                }
            }
        }
        Mode::Move => {
            if ledger.columns.len() > 1 {
                tracing::warn!(
                    algorithms = ledger.columns.len(),
                    "A move can only produce one file per source; \
                     using the first requested algorithm, the rest are report-only"
                );
            }

            if let Some(column) = ledger.columns.first() {
                for (row, entry) in ledger.entries.iter().enumerate() {
                    let src = entry.source_path();
                    let dst = entry.dest_path(&column.names[row]);
                    stats.attempted += 1;

                    match fs_ops::move_file(&src, &dst) {
                        Ok(()) => {
                            tracing::debug!(
                                source = %src.display(),
                                dest = %dst.display(),
                                "Moved file"
                            );
                            stats.completed += 1;
                        }
                        Err(e) => {
                            tracing::warn!(
                                error = %e,
                                source = %src.display(),
                                dest = %dst.display(),
                                "Move failed; continuing"
                            );
                            stats.failed += 1;
                        }
                    }
                }
            }
        }
    }

    ledger.state = RunState::Transferred;
    Ok(stats)
}

/// Turn a transferred ledger into the report table.
///
/// Consumes the ledger; the transient decomposition fields (parent path,
/// stem, suffix) drop here and never reach the report. The remaining
/// columns appear in fixed order (`index`, `filename`, `mode`,
/// `source_dir`, `dest_dir`) followed by one column per algorithm, named
/// by its token. All cell values are strings.
///
/// # Errors
/// Returns `EngineError::InvalidState` if the transfers have not run.
pub fn finalize(ledger: Ledger) -> Result<Report, EngineError> {
    check_state(&ledger, RunState::Transferred)?;

    let Ledger {
        mode,
        entries,
        columns,
        ..
    } = ledger;

    let mut report = Report::default();
    report.push_column("index", entries.iter().map(|e| e.index.to_string()).collect());
    report.push_column("filename", entries.iter().map(|e| e.filename.clone()).collect());
    report.push_column("mode", vec![mode.to_string(); entries.len()]);
    report.push_column(
        "source_dir",
        entries.iter().map(|e| e.source_dir.display().to_string()).collect(),
    );
    report.push_column(
        "dest_dir",
        entries.iter().map(|e| e.dest_dir.display().to_string()).collect(),
    );
    for column in columns {
        report.push_column(column.algorithm.token(), column.names);
    }

    Ok(report)
}
