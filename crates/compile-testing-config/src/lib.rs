// crates/compile-testing-config/src/lib.rs
// ============================================================================
// Module: Compile Testing Config Library
// Description: Canonical harness config model and validation.
// Purpose: Single source of truth for compile-testing.toml semantics.
// Dependencies: compile-testing-support, serde, toml
// ============================================================================

//! ## Overview
//! `compile-testing-config` defines the configuration model for the
//! compile-testing harness: an optional JDK override, source extension
//! allow-lists, and default property overrides. Validation is strict and
//! fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
