// crates/compile-testing-support/src/props.rs
// ============================================================================
// Module: Scoped Property Overrides
// Description: Temporary key/value overrides over a process-wide store.
// Purpose: Install overrides for the extent of a closure and always restore.
// Dependencies: std, tracing
// ============================================================================

//! ## Overview
//! Harness code frequently needs a configuration entry (an environment
//! variable, a compiler property) set for exactly one compilation. This module
//! abstracts the process-wide store behind [`PropertyStore`] and provides
//! [`with_overrides`], which installs a set of overrides, runs a closure, and
//! restores the prior state on every exit path, including unwinding.
//!
//! Invariants:
//! - Each touched key is snapshotted exactly once, before its first write.
//! - When a key appears twice in one call, the last value is installed.
//! - Keys that were absent before the call are removed on restore, never
//!   written back with a placeholder value.
//!
//! The store itself is not synchronized. Callers running in parallel against
//! [`ProcessEnv`] hold [`ProcessEnv::lock`] for the full scoped duration.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::OnceLock;
use std::sync::PoisonError;

use tracing::debug;
use tracing::trace;

// ============================================================================
// SECTION: Store Interface
// ============================================================================

/// Process-wide key/value store that can be read, written, and cleared.
///
/// # Invariants
/// - `get` after `set(key, v)` observes `v` until the next write to `key`.
/// - `get` after `remove(key)` observes `None`.
pub trait PropertyStore {
    /// Value type held by the store.
    type Value: Clone;

    /// Returns the current value for `key`, or `None` when unset.
    fn get(&self, key: &str) -> Option<Self::Value>;

    /// Installs `value` for `key`, replacing any existing value.
    fn set(&self, key: &str, value: &Self::Value);

    /// Removes `key` from the store. Removing an absent key is a no-op.
    fn remove(&self, key: &str);
}

// ============================================================================
// SECTION: Process Environment
// ============================================================================

/// The environment of the current process.
///
/// Values are [`OsString`] so that non-Unicode entries survive a
/// snapshot/restore cycle unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessEnv;

impl ProcessEnv {
    /// Acquires the process-wide environment lock.
    ///
    /// Hold the guard for as long as overrides are installed. A poisoned lock
    /// is recovered: the environment it protects is restored by
    /// [`OverrideGuard`] even when the holder panicked.
    #[must_use]
    pub fn lock() -> MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(())).lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PropertyStore for ProcessEnv {
    type Value = OsString;

    fn get(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }

    /// # Panics
    ///
    /// Panics when `key` is empty or contains `=` or NUL, or when `value`
    /// contains NUL, matching [`std::env::set_var`].
    fn set(&self, key: &str, value: &OsString) {
        env_mut::set_var(key, value);
    }

    fn remove(&self, key: &str) {
        env_mut::remove_var(key);
    }
}

/// Raw environment mutation, confined to one place.
mod env_mut {
    #![allow(unsafe_code, reason = "Environment mutation is unsafe on edition 2024.")]

    use std::ffi::OsStr;

    /// Sets an environment variable for the current process.
    pub fn set_var(key: &str, value: &OsStr) {
        // SAFETY: Callers serialize every environment access, reads included,
        // via `ProcessEnv::lock` or run single-threaded.
        unsafe {
            std::env::set_var(key, value);
        }
    }

    /// Removes an environment variable from the current process.
    pub fn remove_var(key: &str) {
        // SAFETY: Callers serialize every environment access, reads included,
        // via `ProcessEnv::lock` or run single-threaded.
        unsafe {
            std::env::remove_var(key);
        }
    }
}

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// In-memory [`PropertyStore`] for tests and for harness code that must not
/// touch the real process environment.
#[derive(Debug, Default)]
pub struct MemoryPropertyStore {
    /// Current entries.
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryPropertyStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all current entries.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries().clone()
    }

    /// Locks the entry map, recovering from poisoning.
    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryPropertyStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries = iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect();
        Self {
            entries: Mutex::new(entries),
        }
    }
}

impl PropertyStore for MemoryPropertyStore {
    type Value = String;

    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: &String) {
        self.entries().insert(key.to_string(), value.clone());
    }

    fn remove(&self, key: &str) {
        self.entries().remove(key);
    }
}

// ============================================================================
// SECTION: Override Guard
// ============================================================================

/// Drop guard holding the pre-override state of every touched key.
///
/// Restoration runs when the guard is dropped, so it executes on normal
/// return and during unwinding alike.
///
/// # Invariants
/// - `saved` holds at most one entry per key.
/// - Each saved entry is consumed exactly once, on drop.
#[must_use = "overrides are restored as soon as the guard is dropped"]
pub struct OverrideGuard<'a, S: PropertyStore + ?Sized> {
    /// Store the overrides were installed into.
    store: &'a S,
    /// Prior value per key, `None` when the key was unset.
    saved: Vec<(String, Option<S::Value>)>,
}

impl<'a, S: PropertyStore + ?Sized> OverrideGuard<'a, S> {
    /// Snapshots and installs each override in iteration order.
    ///
    /// If installation panics part way through, keys already written are
    /// restored as the partially built guard unwinds. The key whose write
    /// panicked is not recorded and is left untouched.
    pub fn install<I, K, V>(store: &'a S, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<S::Value>,
    {
        let mut guard = Self {
            store,
            saved: Vec::new(),
        };
        for (key, value) in overrides {
            let key = key.into();
            let first_write = !guard.saved.iter().any(|(saved, _)| *saved == key);
            let prior = if first_write { store.get(&key) } else { None };
            // Recorded only after `set` returns: a key the store refused is
            // never handed back to it during unwinding.
            store.set(&key, &value.into());
            if first_write {
                guard.saved.push((key.clone(), prior));
            }
            debug!(key = %key, "property override installed");
        }
        guard
    }

    /// Returns the keys this guard will restore, in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.saved.iter().map(|(key, _)| key.as_str())
    }
}

impl<S: PropertyStore + ?Sized> Drop for OverrideGuard<'_, S> {
    fn drop(&mut self) {
        for (key, prior) in self.saved.drain(..) {
            match prior {
                Some(value) => self.store.set(&key, &value),
                None => self.store.remove(&key),
            }
            trace!(key = %key, "property override restored");
        }
    }
}

// ============================================================================
// SECTION: Scoped Entry Points
// ============================================================================

/// Runs `body` with `overrides` installed in `store`, then restores every
/// touched key to its prior value or absence.
///
/// Whatever `body` produces is returned unchanged; an `Err` result is just a
/// value of `T`. A panic in `body` resumes unwinding after restoration.
pub fn with_overrides<S, I, K, V, F, T>(store: &S, overrides: I, body: F) -> T
where
    S: PropertyStore + ?Sized,
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<S::Value>,
    F: FnOnce() -> T,
{
    let _guard = OverrideGuard::install(store, overrides);
    body()
}

/// Single-key form of [`with_overrides`].
pub fn with_override<S, K, V, F, T>(store: &S, key: K, value: V, body: F) -> T
where
    S: PropertyStore + ?Sized,
    K: Into<String>,
    V: Into<S::Value>,
    F: FnOnce() -> T,
{
    with_overrides(store, [(key, value)], body)
}
