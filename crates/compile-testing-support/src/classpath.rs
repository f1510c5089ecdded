// crates/compile-testing-support/src/classpath.rs
// ============================================================================
// Module: Classpath
// Description: Ordered, deduplicated list of class and resource locations.
// Purpose: Pass an explicit, growable classpath to whatever loads classes.
// Dependencies: std
// ============================================================================

//! ## Overview
//! A [`Classpath`] is built up front and handed to the compiler or loader
//! that needs it. Locations keep insertion order; adding a location that is
//! already present is a no-op. Joining and splitting use the platform path
//! separator.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::ffi::OsStr;
use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Classpath errors.
#[derive(Debug, Error)]
pub enum ClasspathError {
    /// An entry contains the platform path separator.
    #[error("classpath entry contains a path separator: {0}")]
    InvalidEntry(String),
}

// ============================================================================
// SECTION: Classpath
// ============================================================================

/// Ordered set of classpath locations.
///
/// # Invariants
/// - No location appears twice.
/// - Entries keep the order they were first added in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classpath {
    /// Locations in insertion order.
    entries: Vec<PathBuf>,
}

impl Classpath {
    /// Creates an empty classpath.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parses a joined classpath string. Empty segments are skipped.
    #[must_use]
    pub fn parse(joined: &OsStr) -> Self {
        env::split_paths(joined).filter(|path| !path.as_os_str().is_empty()).collect()
    }

    /// Appends `location` unless already present. Returns true if inserted.
    pub fn push(&mut self, location: impl Into<PathBuf>) -> bool {
        let location = location.into();
        if self.contains(&location) {
            return false;
        }
        self.entries.push(location);
        true
    }

    /// Returns true when `location` is already on the classpath.
    #[must_use]
    pub fn contains(&self, location: &Path) -> bool {
        self.entries.iter().any(|entry| entry == location)
    }

    /// Returns the locations in order.
    #[must_use]
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Returns the number of locations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no locations have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Joins the locations with the platform separator.
    ///
    /// # Errors
    ///
    /// Returns [`ClasspathError::InvalidEntry`] when a location contains the
    /// separator and therefore cannot be represented.
    pub fn to_os_string(&self) -> Result<OsString, ClasspathError> {
        env::join_paths(&self.entries).map_err(|_| {
            let offending = self
                .entries
                .iter()
                .find(|entry| env::join_paths([entry.as_path()]).is_err())
                .map(|entry| entry.display().to_string())
                .unwrap_or_default();
            ClasspathError::InvalidEntry(offending)
        })
    }
}

impl<P: Into<PathBuf>> Extend<P> for Classpath {
    fn extend<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        for location in iter {
            self.push(location);
        }
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for Classpath {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut classpath = Self::new();
        classpath.extend(iter);
        classpath
    }
}
