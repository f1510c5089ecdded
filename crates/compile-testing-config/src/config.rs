// crates/compile-testing-config/src/config.rs
// ============================================================================
// Module: Harness Configuration
// Description: Configuration loading and validation for compile-testing runs.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: compile-testing-support, serde, toml, tracing
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file whose path comes from the caller,
//! the `COMPILE_TESTING_CONFIG` environment variable, or the default
//! `compile-testing.toml`. Unknown fields, oversized files, and invalid values
//! fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use compile_testing_support::ExtensionAllowlist;
use compile_testing_support::JavaRuntime;
use compile_testing_support::JdkError;
use compile_testing_support::ProcessEnv;
use compile_testing_support::PropertyStore;
use compile_testing_support::SourceClassifier;
use compile_testing_support::sources::JAVA_EXTENSIONS;
use compile_testing_support::sources::KOTLIN_EXTENSIONS;
use compile_testing_support::with_overrides;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "compile-testing.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "COMPILE_TESTING_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of a property key in bytes.
pub const MAX_PROPERTY_KEY_LENGTH: usize = 255;
/// Maximum length of a property value in bytes.
pub const MAX_PROPERTY_VALUE_LENGTH: usize = 64 * 1024;
/// Maximum number of default property overrides.
pub const MAX_PROPERTIES: usize = 256;
/// Maximum number of extensions per source kind.
const MAX_EXTENSIONS: usize = 32;

// ============================================================================
// SECTION: Configuration Model
// ============================================================================

/// Top-level harness configuration.
///
/// # Invariants
/// - Valid only after [`HarnessConfig::validate`] succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Explicit Java runtime home; discovered from the environment when unset.
    #[serde(default)]
    pub java_home: Option<PathBuf>,
    /// Source classification settings.
    #[serde(default)]
    pub sources: SourcesConfig,
    /// Properties installed around every compilation.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// Extension allow-lists per source kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourcesConfig {
    /// Kotlin extensions, without the leading dot.
    #[serde(default = "default_kotlin_extensions")]
    pub kotlin_extensions: Vec<String>,
    /// Java extensions, without the leading dot.
    #[serde(default = "default_java_extensions")]
    pub java_extensions: Vec<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            kotlin_extensions: default_kotlin_extensions(),
            java_extensions: default_java_extensions(),
        }
    }
}

impl HarnessConfig {
    /// Loads configuration, resolving the path from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is unreadable or invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, &ProcessEnv)
    }

    /// Loads configuration, resolving the path through `store`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is unreadable or invalid.
    pub fn load_with<S>(path: Option<&Path>, store: &S) -> Result<Self, ConfigError>
    where
        S: PropertyStore + ?Sized,
        S::Value: AsRef<OsStr>,
    {
        let resolved = resolve_path(path, store)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        debug!(path = %resolved.display(), properties = config.properties.len(), "config loaded");
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(java_home) = &self.java_home {
            validate_path_value("java_home", java_home)?;
        }
        self.sources.validate()?;
        validate_properties(&self.properties)
    }

    /// Builds a source classifier from the configured allow-lists.
    #[must_use]
    pub fn source_classifier(&self) -> SourceClassifier {
        SourceClassifier::new(
            ExtensionAllowlist::new(&self.sources.kotlin_extensions),
            ExtensionAllowlist::new(&self.sources.java_extensions),
        )
    }

    /// Locates the Java runtime, preferring the configured `java_home`.
    ///
    /// # Errors
    ///
    /// Returns [`JdkError`] when no usable runtime is found.
    pub fn java_runtime<S>(&self, store: &S) -> Result<JavaRuntime, JdkError>
    where
        S: PropertyStore + ?Sized,
        S::Value: AsRef<OsStr>,
    {
        JavaRuntime::locate(self.java_home.as_deref(), store)
    }

    /// Runs `body` with the configured properties installed in `store`.
    pub fn with_properties<S, F, T>(&self, store: &S, body: F) -> T
    where
        S: PropertyStore + ?Sized,
        for<'a> &'a String: Into<S::Value>,
        F: FnOnce() -> T,
    {
        with_overrides(store, &self.properties, body)
    }
}

impl SourcesConfig {
    /// Validates the extension lists.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_extensions("sources.kotlin_extensions", &self.kotlin_extensions)?;
        validate_extensions("sources.java_extensions", &self.java_extensions)?;
        let overlap = self.kotlin_extensions.iter().find(|kotlin| {
            self.java_extensions.iter().any(|java| java.eq_ignore_ascii_case(kotlin))
        });
        if let Some(extension) = overlap {
            return Err(ConfigError::Invalid(format!(
                "extension {extension} listed for both kotlin and java"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Default Kotlin extensions.
fn default_kotlin_extensions() -> Vec<String> {
    KOTLIN_EXTENSIONS.iter().map(ToString::to_string).collect()
}

/// Default Java extensions.
fn default_java_extensions() -> Vec<String> {
    JAVA_EXTENSIONS.iter().map(ToString::to_string).collect()
}

/// Resolves the config path from the caller or environment defaults.
fn resolve_path<S>(path: Option<&Path>, store: &S) -> Result<PathBuf, ConfigError>
where
    S: PropertyStore + ?Sized,
    S::Value: AsRef<OsStr>,
{
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Some(env_path) = store.get(CONFIG_ENV_VAR) {
        let env_path = env_path.as_ref();
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a configured path value.
fn validate_path_value(field: &str, path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if path.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    if path.components().any(|component| component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH)
    {
        return Err(ConfigError::Invalid(format!("{field} path component too long")));
    }
    Ok(())
}

/// Validates one extension allow-list.
fn validate_extensions(field: &str, extensions: &[String]) -> Result<(), ConfigError> {
    if extensions.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if extensions.len() > MAX_EXTENSIONS {
        return Err(ConfigError::Invalid(format!("{field} exceeds {MAX_EXTENSIONS} entries")));
    }
    for extension in extensions {
        if extension.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("{field} entries must be non-empty")));
        }
        if extension.contains(['.', '/', '\\']) || extension.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid(format!(
                "{field} entry {extension} must be a bare extension"
            )));
        }
    }
    Ok(())
}

/// Validates default property overrides.
fn validate_properties(properties: &BTreeMap<String, String>) -> Result<(), ConfigError> {
    if properties.len() > MAX_PROPERTIES {
        return Err(ConfigError::Invalid(format!("properties exceeds {MAX_PROPERTIES} entries")));
    }
    for (key, value) in properties {
        if key.is_empty() {
            return Err(ConfigError::Invalid("property keys must be non-empty".to_string()));
        }
        if key.len() > MAX_PROPERTY_KEY_LENGTH {
            return Err(ConfigError::Invalid(format!("property key {key} exceeds max length")));
        }
        if key.contains(['=', '\0']) {
            return Err(ConfigError::Invalid(format!(
                "property key {key} must not contain '=' or NUL"
            )));
        }
        if value.len() > MAX_PROPERTY_VALUE_LENGTH {
            return Err(ConfigError::Invalid(format!("property {key} value exceeds max length")));
        }
        if value.contains('\0') {
            return Err(ConfigError::Invalid(format!("property {key} value must not contain NUL")));
        }
    }
    Ok(())
}
