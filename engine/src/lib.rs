//! # copy2hash Engine - Hash-Named File Transfer Library
//!
//! A headless engine for copying or moving files to hash-derived names.
//! Designed as the foundation for the command line tool, but usable on its
//! own.
//!
//! ## Overview
//!
//! The engine hashes each input's *filename string* (never its contents)
//! under one or more digest algorithms, transfers the file to the derived
//! name, and records everything in a columnar ledger that is written out
//! as a report. It features:
//! - A closed set of fourteen digest algorithms
//! - Configurable hash-name composition (keep, replace or strip extension)
//! - Per-file error isolation: one bad file never aborts a batch
//! - Report output in CSV, JSON, YAML, XML, binary and delimited text
//!
//! ## Basic Usage
//!
//! ```no_run
//! use engine::{
//!     assign_hashes, collect_metadata, create_ledger, execute_transfers, finalize,
//!     write_report, DigestAlgorithm, HashNamer, Mode, NamingPolicy, ReportFormat,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // One ledger per run
//! let mut ledger = create_ledger(Mode::Copy, vec![DigestAlgorithm::Sha256])?;
//! collect_metadata(&mut ledger, &["notes.txt".into()], None)?;
//!
//! // Compute the hash-derived names
//! let namer = HashNamer::new(NamingPolicy::default());
//! assign_hashes(&mut ledger, &namer)?;
//!
//! // Copy the files
//! let stats = execute_transfers(&mut ledger)?;
//! println!("copied {} of {} files", stats.completed, stats.attempted);
//!
//! // Emit the report
//! let report = finalize(ledger)?;
//! write_report(&report, "copy_report", &[ReportFormat::Json])?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - **model**: Core data structures (Ledger, FileEntry, enums)
//! - **error**: Error types and handling
//! - **naming**: Digest algorithms and hash-name composition
//! - **fs_ops**: Low-level filesystem operations
//! - **run**: Run orchestration (collect, hash, transfer, finalize)
//! - **report**: Report table and format writers

pub mod error;
pub mod fs_ops;
pub mod model;
pub mod naming;
pub mod report;
pub mod run;

// Re-export main types and functions
pub use error::EngineError;
pub use fs_ops::{decompose, resolve_destination, PathParts};
pub use model::{FileEntry, HashColumn, Ledger, Mode, RunState, TransferStats};
pub use naming::{
    compose_name, hash_of, supported_tokens, DigestAlgorithm, Digester, HashNamer, NamingPolicy,
};
pub use report::{write_report, Report, ReportColumn, ReportFormat};
pub use run::{assign_hashes, collect_metadata, create_ledger, execute_transfers, finalize};
