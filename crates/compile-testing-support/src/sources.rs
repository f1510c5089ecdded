// crates/compile-testing-support/src/sources.rs
// ============================================================================
// Module: Source Classification
// Description: Classifies files as Kotlin, Java, or other by extension.
// Purpose: Route harness inputs to the right compiler.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Classification looks only at the file extension and compares it
//! case-insensitively against a fixed allow-list. File contents are never
//! inspected.

use std::path::Path;

/// Default Kotlin source extensions.
pub const KOTLIN_EXTENSIONS: [&str; 2] = ["kt", "kts"];
/// Default Java source extensions.
pub const JAVA_EXTENSIONS: [&str; 1] = ["java"];

/// Kind of source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Kotlin source or script.
    Kotlin,
    /// Java source.
    Java,
    /// Anything else.
    Other,
}

/// Case-insensitive set of file extensions, stored without the leading dot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtensionAllowlist {
    /// Lowercased extensions.
    extensions: Vec<String>,
}

impl ExtensionAllowlist {
    /// Builds an allow-list; entries are lowercased and deduplicated.
    pub fn new<I, E>(extensions: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: AsRef<str>,
    {
        let mut list = Self::default();
        for extension in extensions {
            let lowered = extension.as_ref().to_ascii_lowercase();
            if !list.extensions.contains(&lowered) {
                list.extensions.push(lowered);
            }
        }
        list
    }

    /// Returns true when `path` has an extension in the list.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        has_extension(path, self.extensions.iter().map(String::as_str))
    }

    /// Returns the extensions in insertion order.
    #[must_use]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

/// Classifier built from one allow-list per source kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceClassifier {
    /// Kotlin extensions.
    kotlin: ExtensionAllowlist,
    /// Java extensions.
    java: ExtensionAllowlist,
}

impl SourceClassifier {
    /// Builds a classifier from explicit allow-lists.
    #[must_use]
    pub const fn new(kotlin: ExtensionAllowlist, java: ExtensionAllowlist) -> Self {
        Self {
            kotlin,
            java,
        }
    }

    /// Classifies `path`. Kotlin wins if both lists match.
    #[must_use]
    pub fn classify(&self, path: &Path) -> SourceKind {
        kind_of(path, |path| self.kotlin.matches(path), |path| self.java.matches(path))
    }
}

impl Default for SourceClassifier {
    fn default() -> Self {
        Self::new(
            ExtensionAllowlist::new(KOTLIN_EXTENSIONS),
            ExtensionAllowlist::new(JAVA_EXTENSIONS),
        )
    }
}

/// Returns true for `.kt` and `.kts` files, in any case.
#[must_use]
pub fn is_kotlin_file(path: &Path) -> bool {
    has_extension(path, KOTLIN_EXTENSIONS)
}

/// Returns true for `.java` files, in any case.
#[must_use]
pub fn is_java_file(path: &Path) -> bool {
    has_extension(path, JAVA_EXTENSIONS)
}

/// Classifies `path` with the default allow-lists.
#[must_use]
pub fn classify(path: &Path) -> SourceKind {
    kind_of(path, is_kotlin_file, is_java_file)
}

/// Picks the source kind from per-kind matchers. Kotlin is checked first.
fn kind_of(
    path: &Path,
    is_kotlin: impl FnOnce(&Path) -> bool,
    is_java: impl FnOnce(&Path) -> bool,
) -> SourceKind {
    if is_kotlin(path) {
        SourceKind::Kotlin
    } else if is_java(path) {
        SourceKind::Java
    } else {
        SourceKind::Other
    }
}

/// Checks the extension of `path` case-insensitively against `allowed`.
fn has_extension<'a>(path: &Path, allowed: impl IntoIterator<Item = &'a str>) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| allowed.into_iter().any(|known| known.eq_ignore_ascii_case(ext)))
}
