// crates/compile-testing-support/src/files.rs
// ============================================================================
// Module: File Listing
// Description: Recursive listing of regular files below a directory.
// Purpose: Collect generated sources and outputs for harness assertions.
// Dependencies: std, thiserror, walkdir
// ============================================================================

//! ## Overview
//! Lists every regular file below a directory at any depth. Directories are
//! descended into but not reported. Symlinks are followed and reported under
//! their link path; walkdir detects link loops and reports them as errors.
//! Entries are visited in file-name order at every level, so listings are
//! sorted by path.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;
use walkdir::WalkDir;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// File listing errors.
#[derive(Debug, Error)]
pub enum FilesError {
    /// The listing root is missing or not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
    /// A directory entry could not be read.
    #[error("file listing io error: {0}")]
    Io(String),
}

// ============================================================================
// SECTION: Listing
// ============================================================================

/// Returns every regular file below `dir`, sorted by path.
///
/// `dir` itself is never part of the result.
///
/// # Errors
///
/// Returns [`FilesError::NotADirectory`] when `dir` is not a directory and
/// [`FilesError::Io`] when any entry below it cannot be read, including
/// broken or looping symlinks.
pub fn list_files_recursively(dir: &Path) -> Result<Vec<PathBuf>, FilesError> {
    if !dir.is_dir() {
        return Err(FilesError::NotADirectory(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|err| FilesError::Io(err.to_string()))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
