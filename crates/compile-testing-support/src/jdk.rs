// crates/compile-testing-support/src/jdk.rs
// ============================================================================
// Module: JDK Discovery
// Description: Locates the host Java runtime and derives the JDK home.
// Purpose: Give the harness a JDK root for compiler classpaths and tools.
// Dependencies: std, thiserror, tracing
// ============================================================================

//! ## Overview
//! A Java runtime home is located from an explicit path, the `java.home`
//! store entry, or `JAVA_HOME`, in that order. The runtime major version is
//! read from the JDK `release` file. Up to Java 8 the runtime home is the
//! `jre/` directory inside the JDK, so the JDK home is its parent; from
//! Java 9 on the runtime home is the JDK home.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::props::PropertyStore;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Store key consulted first for the runtime home.
pub const JAVA_HOME_PROPERTY: &str = "java.home";
/// Environment variable consulted when the property is unset.
pub const JAVA_HOME_ENV_VAR: &str = "JAVA_HOME";
/// Name of the JDK metadata file holding `JAVA_VERSION`.
const RELEASE_FILE: &str = "release";
/// Key of the version entry in the release file.
const VERSION_KEY: &str = "JAVA_VERSION";
/// Last major version whose runtime home is nested under the JDK home.
const LAST_NESTED_JRE_MAJOR: u32 = 8;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// JDK discovery errors.
#[derive(Debug, Error)]
pub enum JdkError {
    /// No explicit path, property, or environment variable was set.
    #[error("no java home found")]
    JavaHomeNotFound,
    /// The resolved home is not an existing directory.
    #[error("java home is not a directory: {0}")]
    NotADirectory(PathBuf),
    /// Neither the home nor its parent holds a release file.
    #[error("jdk release file missing under {0}")]
    ReleaseFileMissing(PathBuf),
    /// The release file could not be read.
    #[error("jdk release file unreadable: {0}")]
    Io(String),
    /// `JAVA_VERSION` is missing or malformed.
    #[error("invalid java version: {0}")]
    InvalidVersion(String),
}

// ============================================================================
// SECTION: Version
// ============================================================================

/// Java runtime version, reduced to the major number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct JavaVersion {
    /// Feature release number (8, 11, 17, ...).
    pub major: u32,
}

impl JavaVersion {
    /// Parses a `JAVA_VERSION` value such as `1.8.0_292`, `11.0.2`, or `21`.
    ///
    /// # Errors
    ///
    /// Returns [`JdkError::InvalidVersion`] when no major number is found.
    pub fn parse(text: &str) -> Result<Self, JdkError> {
        let trimmed = text.trim().trim_matches('"');
        let mut parts = trimmed.split(['.', '_', '-', '+']);
        let first = parse_component(parts.next(), trimmed)?;
        let major = if first == 1 { parse_component(parts.next(), trimmed)? } else { first };
        if major == 0 {
            return Err(JdkError::InvalidVersion(trimmed.to_string()));
        }
        Ok(Self {
            major,
        })
    }
}

/// Parses one numeric version component.
fn parse_component(part: Option<&str>, full: &str) -> Result<u32, JdkError> {
    part.and_then(|value| value.parse().ok())
        .ok_or_else(|| JdkError::InvalidVersion(full.to_string()))
}

// ============================================================================
// SECTION: Runtime
// ============================================================================

/// A located Java runtime.
///
/// # Invariants
/// - `home` is an existing directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaRuntime {
    /// Runtime home, the equivalent of the `java.home` property.
    pub home: PathBuf,
    /// Runtime version.
    pub version: JavaVersion,
}

impl JavaRuntime {
    /// Locates the runtime home and detects its version.
    ///
    /// # Errors
    ///
    /// Returns [`JdkError`] when no home is configured or it is unusable.
    pub fn locate<S>(explicit: Option<&Path>, store: &S) -> Result<Self, JdkError>
    where
        S: PropertyStore + ?Sized,
        S::Value: AsRef<OsStr>,
    {
        let home = locate_java_home(explicit, store)?;
        Self::detect(home)
    }

    /// Detects the version of the runtime rooted at `home`.
    ///
    /// # Errors
    ///
    /// Returns [`JdkError`] when `home` is not a directory or carries no
    /// readable release file.
    pub fn detect(home: impl Into<PathBuf>) -> Result<Self, JdkError> {
        let home = home.into();
        if !home.is_dir() {
            return Err(JdkError::NotADirectory(home));
        }
        let release = find_release_file(&home)?;
        let content = fs::read_to_string(&release).map_err(|err| JdkError::Io(err.to_string()))?;
        let version = parse_release(&content)?;
        debug!(home = %home.display(), major = version.major, "java runtime detected");
        Ok(Self {
            home,
            version,
        })
    }

    /// Returns true when the runtime is Java 9 or later.
    #[must_use]
    pub const fn is_jdk9_or_later(&self) -> bool {
        self.version.major > LAST_NESTED_JRE_MAJOR
    }

    /// Returns the JDK home for this runtime.
    ///
    /// Up to Java 8 this is the parent of the runtime home; afterwards it is
    /// the runtime home itself. A bare relative home such as `jre` yields `.`.
    #[must_use]
    pub fn jdk_home(&self) -> &Path {
        if self.is_jdk9_or_later() {
            return &self.home;
        }
        match self.home.parent() {
            Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
            Some(parent) => parent,
            None => &self.home,
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the runtime home from an explicit path, `java.home`, or
/// `JAVA_HOME`, and checks that it is a directory.
///
/// # Errors
///
/// Returns [`JdkError::JavaHomeNotFound`] when nothing is set and
/// [`JdkError::NotADirectory`] when the resolved path is not a directory.
pub fn locate_java_home<S>(explicit: Option<&Path>, store: &S) -> Result<PathBuf, JdkError>
where
    S: PropertyStore + ?Sized,
    S::Value: AsRef<OsStr>,
{
    let home = match explicit {
        Some(path) => path.to_path_buf(),
        None => store
            .get(JAVA_HOME_PROPERTY)
            .or_else(|| store.get(JAVA_HOME_ENV_VAR))
            .map(|value| PathBuf::from(value.as_ref()))
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or(JdkError::JavaHomeNotFound)?,
    };
    if !home.is_dir() {
        return Err(JdkError::NotADirectory(home));
    }
    Ok(home)
}

/// Finds the release file in `home` or its parent.
fn find_release_file(home: &Path) -> Result<PathBuf, JdkError> {
    let own = home.join(RELEASE_FILE);
    if own.is_file() {
        return Ok(own);
    }
    if let Some(parent) = home.parent() {
        let nested = parent.join(RELEASE_FILE);
        if nested.is_file() {
            return Ok(nested);
        }
    }
    Err(JdkError::ReleaseFileMissing(home.to_path_buf()))
}

/// Extracts `JAVA_VERSION` from release file content.
fn parse_release(content: &str) -> Result<JavaVersion, JdkError> {
    content
        .lines()
        .filter_map(|line| line.split_once('='))
        .find(|(key, _)| key.trim() == VERSION_KEY)
        .map_or_else(
            || Err(JdkError::InvalidVersion(format!("{VERSION_KEY} missing"))),
            |(_, value)| JavaVersion::parse(value),
        )
}
