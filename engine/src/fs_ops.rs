//! Filesystem operations module.
//!
//! This module provides low-level operations for:
//! - Decomposing input paths into the metadata the ledger records
//! - Resolving destination directories
//! - Copying and moving files with metadata preservation
//! - Creating directories recursively

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::EngineError;

/// The pieces of an input path the pipeline works with.
///
/// All four fields are derived from the path *string*; the filesystem is not
/// consulted, so decomposition never fails. Degenerate inputs (a bare `.`,
/// a root path) produce an empty `filename` and surface later as per-file
/// transfer failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParts {
    /// Final path component, empty when the path has none
    pub filename: String,
    /// Containing directory, `.` for bare filenames
    pub parent: PathBuf,
    /// Filename without its last extension
    pub stem: String,
    /// Last extension including the leading dot, empty when there is none
    pub suffix: String,
}

/// Split an input path into filename, parent, stem and suffix.
///
/// The stem/suffix split follows the usual path conventions: only the last
/// extension counts (`a.tar.gz` has suffix `.gz`), a leading dot is part of
/// the stem (`.bashrc` has no suffix), and a trailing dot yields no suffix.
pub fn decompose(path: &Path) -> PathParts {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let parent = match path.parent() {
        Some(p) if p.as_os_str().is_empty() => PathBuf::from("."),
        Some(p) => p.to_path_buf(),
        None => PathBuf::from("."),
    };

    let (stem, suffix) = match filename.rfind('.') {
        Some(i) if i > 0 && i < filename.len() - 1 => {
            (filename[..i].to_string(), filename[i..].to_string())
        }
        _ => (filename.clone(), String::new()),
    };

    PathParts {
        filename,
        parent,
        stem,
        suffix,
    }
}

/// Pick the destination directory for a decomposed input.
///
/// An explicit `directory` redirects the file; otherwise it stays next to
/// the source, in its own parent.
pub fn resolve_destination(parts: &PathParts, directory: Option<&Path>) -> PathBuf {
    match directory {
        Some(dir) => dir.to_path_buf(),
        None => parts.parent.clone(),
    }
}

/// Ensure a directory exists, creating it recursively if necessary.
///
/// # Errors
/// Returns `EngineError::DirectoryCreationFailed` if the path exists but is
/// not a directory, or creation fails.
pub fn ensure_dir_exists(dir: &Path) -> Result<(), EngineError> {
    match fs::metadata(dir) {
        Ok(metadata) => {
            if metadata.is_dir() {
                Ok(())
            } else {
                Err(EngineError::DirectoryCreationFailed {
                    path: dir.to_path_buf(),
                    source: io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "path exists but is not a directory",
                    ),
                })
            }
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|e| EngineError::DirectoryCreationFailed {
                path: dir.to_path_buf(),
                source: e,
            })?;
            tracing::debug!(path = %dir.display(), "Created directory");
            Ok(())
        }
        Err(e) => Err(EngineError::DirectoryCreationFailed {
            path: dir.to_path_buf(),
            source: e,
        }),
    }
}

fn ensure_parent_dir_exists(path: &Path) -> Result<(), EngineError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir_exists(parent),
        _ => Ok(()),
    }
}

/// Copy a file from source to destination with metadata preservation.
///
/// # Returns
/// Number of bytes copied
///
/// # Errors
/// Returns `EngineError` if the copy fails.
pub fn copy_file_with_metadata(src: &Path, dst: &Path) -> Result<u64, EngineError> {
    ensure_parent_dir_exists(dst)?;

    let mut src_file = fs::File::open(src).map_err(|e| EngineError::ReadError {
        path: src.to_path_buf(),
        source: e,
    })?;

    // Capture the source mtime before the copy
    let src_metadata = src_file.metadata().map_err(|e| EngineError::ReadError {
        path: src.to_path_buf(),
        source: e,
    })?;
    let src_mtime = src_metadata.modified().ok();

    let mut dst_file = fs::File::create(dst).map_err(|e| EngineError::WriteError {
        path: dst.to_path_buf(),
        source: e,
    })?;

    let bytes_copied = io::copy(&mut src_file, &mut dst_file).map_err(|e| {
        if e.kind() == io::ErrorKind::PermissionDenied {
            EngineError::WriteError {
                path: dst.to_path_buf(),
                source: e,
            }
        } else {
            EngineError::ReadError {
                path: src.to_path_buf(),
                source: e,
            }
        }
    })?;

    // Preserve modification time if available
    if let Some(mtime) = src_mtime {
        let _ = fs::metadata(dst).and_then(|_| {
            filetime::set_file_mtime(dst, filetime::FileTime::from_system_time(mtime))
        });
    }

    Ok(bytes_copied)
}

/// Move a file from source to destination.
///
/// Renames when possible; cross-device moves fall back to a copy followed
/// by removal of the source.
///
/// # Errors
/// Returns `EngineError` if neither the rename nor the fallback succeeds.
pub fn move_file(src: &Path, dst: &Path) -> Result<(), EngineError> {
    ensure_parent_dir_exists(dst)?;

    match fs::rename(src, dst) {
        Ok(()) => Ok(()),
        Err(_) => {
            copy_file_with_metadata(src, dst)?;
            fs::remove_file(src).map_err(|e| EngineError::MoveError {
                from: src.to_path_buf(),
                to: dst.to_path_buf(),
                source: e,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_decompose_file_with_parent() {
        let parts = decompose(Path::new("dir/sub/report.txt"));
        assert_eq!(parts.filename, "report.txt");
        assert_eq!(parts.parent, PathBuf::from("dir/sub"));
        assert_eq!(parts.stem, "report");
        assert_eq!(parts.suffix, ".txt");
    }

    #[test]
    fn test_decompose_bare_filename() {
        let parts = decompose(Path::new("report.txt"));
        assert_eq!(parts.parent, PathBuf::from("."));
        assert_eq!(parts.filename, "report.txt");
    }

    #[test]
    fn test_decompose_dotfile_has_no_suffix() {
        let parts = decompose(Path::new("conf/.bashrc"));
        assert_eq!(parts.filename, ".bashrc");
        assert_eq!(parts.stem, ".bashrc");
        assert_eq!(parts.suffix, "");
    }

    #[test]
    fn test_decompose_keeps_only_last_extension() {
        let parts = decompose(Path::new("archive.tar.gz"));
        assert_eq!(parts.stem, "archive.tar");
        assert_eq!(parts.suffix, ".gz");
    }

    #[test]
    fn test_decompose_trailing_dot_has_no_suffix() {
        let parts = decompose(Path::new("odd."));
        assert_eq!(parts.stem, "odd.");
        assert_eq!(parts.suffix, "");
    }

    #[test]
    fn test_decompose_degenerate_path() {
        let parts = decompose(Path::new("."));
        assert_eq!(parts.filename, "");
        assert_eq!(parts.stem, "");
        assert_eq!(parts.suffix, "");
    }

    #[test]
    fn test_resolve_destination_prefers_override() {
        let parts = decompose(Path::new("dir/report.txt"));
        assert_eq!(
            resolve_destination(&parts, Some(Path::new("out"))),
            PathBuf::from("out")
        );
        assert_eq!(resolve_destination(&parts, None), PathBuf::from("dir"));
    }

    #[test]
    fn test_ensure_dir_exists_creates_nested() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let nested = temp_dir.path().join("a").join("b").join("c");

        ensure_dir_exists(&nested).expect("Failed to create nested dir");
        assert!(nested.is_dir());

        // Idempotent on an existing directory
        ensure_dir_exists(&nested).expect("Existing dir should be fine");
    }

    #[test]
    fn test_ensure_dir_exists_rejects_file() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("not_a_dir");
        fs::File::create(&file_path).expect("Failed to create file");

        let result = ensure_dir_exists(&file_path);
        assert!(result.is_err());
    }

    #[test]
    fn test_copy_file_with_metadata() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src_file = temp_dir.path().join("source.txt");
        let dst_file = temp_dir.path().join("dest.txt");

        let mut file = fs::File::create(&src_file).expect("Failed to create source");
        file.write_all(b"test content").expect("Failed to write source");
        drop(file);

        let bytes = copy_file_with_metadata(&src_file, &dst_file).expect("Failed to copy");
        assert_eq!(bytes, 12);

        let content = fs::read_to_string(&dst_file).expect("Failed to read dest");
        assert_eq!(content, "test content");
    }

    #[test]
    fn test_copy_preserves_mtime() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src_file = temp_dir.path().join("source.txt");
        let dst_file = temp_dir.path().join("dest.txt");

        fs::write(&src_file, b"stamped").expect("Failed to write source");
        let stamp = filetime::FileTime::from_unix_time(1_600_000_000, 0);
        filetime::set_file_mtime(&src_file, stamp).expect("Failed to set mtime");

        copy_file_with_metadata(&src_file, &dst_file).expect("Failed to copy");

        let dst_meta = fs::metadata(&dst_file).expect("Failed to stat dest");
        let dst_mtime = filetime::FileTime::from_last_modification_time(&dst_meta);
        assert_eq!(dst_mtime.unix_seconds(), stamp.unix_seconds());
    }

    #[test]
    fn test_copy_missing_source_fails() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src_file = temp_dir.path().join("missing.txt");
        let dst_file = temp_dir.path().join("dest.txt");

        let result = copy_file_with_metadata(&src_file, &dst_file);
        assert!(result.is_err());
    }

    #[test]
    fn test_move_file_removes_source() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src_file = temp_dir.path().join("source.txt");
        let dst_file = temp_dir.path().join("moved.txt");

        fs::write(&src_file, b"move me").expect("Failed to write source");

        move_file(&src_file, &dst_file).expect("Failed to move");
        assert!(!src_file.exists());
        let content = fs::read_to_string(&dst_file).expect("Failed to read dest");
        assert_eq!(content, "move me");
    }

    #[test]
    fn test_move_creates_destination_parent() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src_file = temp_dir.path().join("source.txt");
        let dst_file = temp_dir.path().join("new_dir").join("moved.txt");

        fs::write(&src_file, b"move me").expect("Failed to write source");

        move_file(&src_file, &dst_file).expect("Failed to move");
        assert!(dst_file.exists());
    }
}
