// crates/compile-testing-support/src/lib.rs
// ============================================================================
// Module: Compile Testing Support
// Description: Helper utilities for compiler and processor test harnesses.
// Purpose: Scoped property overrides, JDK discovery, and source file helpers.
// Dependencies: thiserror, tracing, walkdir
// ============================================================================

//! ## Overview
//! This crate provides the glue a compilation test harness needs around an
//! actual compiler run: temporarily overriding process-wide properties,
//! locating the host JDK, listing and classifying source files, and building
//! an explicit classpath.
//! Invariants:
//! - Scoped overrides are restored on every exit path, including panics.
//! - Helpers are stateless apart from the property store they are given.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod classpath;
pub mod files;
pub mod jdk;
pub mod props;
pub mod sources;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use classpath::Classpath;
pub use classpath::ClasspathError;
pub use files::FilesError;
pub use files::list_files_recursively;
pub use jdk::JavaRuntime;
pub use jdk::JavaVersion;
pub use jdk::JdkError;
pub use jdk::locate_java_home;
pub use props::MemoryPropertyStore;
pub use props::OverrideGuard;
pub use props::ProcessEnv;
pub use props::PropertyStore;
pub use props::with_override;
pub use props::with_overrides;
pub use sources::ExtensionAllowlist;
pub use sources::SourceClassifier;
pub use sources::SourceKind;
pub use sources::classify;
pub use sources::is_java_file;
pub use sources::is_kotlin_file;
