//! Config loading tests for compile-testing-config.
// crates/compile-testing-config/tests/config_load.rs
// =============================================================================
// Module: Config Loading Tests
// Description: Path resolution, file limits, and harness wiring.
// Purpose: Ensure config files load fail-closed and feed the support helpers.
// =============================================================================

use std::fs;

use compile_testing_config::CONFIG_ENV_VAR;
use compile_testing_config::ConfigError;
use compile_testing_config::HarnessConfig;
use compile_testing_config::MAX_CONFIG_FILE_SIZE;
use compile_testing_support::MemoryPropertyStore;
use compile_testing_support::PropertyStore;

mod common;

use common::TestResult;
use common::assert_invalid;

#[test]
fn explicit_path_loads_and_validates() -> TestResult {
    let temp = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = temp.path().join("harness.toml");
    fs::write(&path, "[properties]\n\"idea.io.use.nio2\" = \"true\"\n")
        .map_err(|err| err.to_string())?;

    let config = HarnessConfig::load(Some(path.as_path())).map_err(|err| err.to_string())?;

    if config.properties.get("idea.io.use.nio2").map(String::as_str) != Some("true") {
        return Err("property not loaded".to_string());
    }
    Ok(())
}

#[test]
fn env_var_path_is_used_when_no_path_given() -> TestResult {
    let temp = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = temp.path().join("from-env.toml");
    fs::write(&path, "java_home = \"/opt/jdk\"\n").map_err(|err| err.to_string())?;
    let store: MemoryPropertyStore =
        [(CONFIG_ENV_VAR, path.display().to_string())].into_iter().collect();

    let config = HarnessConfig::load_with(None, &store).map_err(|err| err.to_string())?;

    if config.java_home.as_deref() != Some(std::path::Path::new("/opt/jdk")) {
        return Err("config from env path not loaded".to_string());
    }
    Ok(())
}

#[test]
fn missing_file_is_io_error() -> TestResult {
    let temp = tempfile::tempdir().map_err(|err| err.to_string())?;
    let result = HarnessConfig::load(Some(temp.path().join("absent.toml").as_path()));
    match result {
        Err(ConfigError::Io(_)) => Ok(()),
        Err(other) => Err(format!("expected io error, got {other}")),
        Ok(_) => Err("missing file should not load".to_string()),
    }
}

#[test]
fn oversized_file_is_rejected() -> TestResult {
    let temp = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = temp.path().join("big.toml");
    let padding = format!("# {}\n", "x".repeat(MAX_CONFIG_FILE_SIZE));
    fs::write(&path, padding).map_err(|err| err.to_string())?;

    assert_invalid(HarnessConfig::load(Some(path.as_path())), "config file exceeds size limit")
}

#[test]
fn non_utf8_file_is_rejected() -> TestResult {
    let temp = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = temp.path().join("binary.toml");
    fs::write(&path, [0xff_u8, 0xfe, 0x00]).map_err(|err| err.to_string())?;

    assert_invalid(HarnessConfig::load(Some(path.as_path())), "config file must be utf-8")
}

#[test]
fn invalid_values_fail_load() -> TestResult {
    let temp = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = temp.path().join("invalid.toml");
    fs::write(&path, "[sources]\njava_extensions = []\n").map_err(|err| err.to_string())?;

    assert_invalid(
        HarnessConfig::load(Some(path.as_path())),
        "sources.java_extensions must be non-empty",
    )
}

#[test]
fn configured_properties_are_scoped() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.properties.insert("kapt.verbose".to_string(), "true".to_string());
    config.properties.insert("fresh".to_string(), "1".to_string());
    let store: MemoryPropertyStore = [("kapt.verbose", "false")].into_iter().collect();

    let during = config.with_properties(&store, || store.snapshot());

    if during.get("kapt.verbose").map(String::as_str) != Some("true")
        || during.get("fresh").map(String::as_str) != Some("1")
    {
        return Err("configured properties not installed".to_string());
    }
    if store.get("kapt.verbose").as_deref() != Some("false") || store.get("fresh").is_some() {
        return Err("configured properties leaked past the scope".to_string());
    }
    Ok(())
}

#[test]
fn configured_java_home_is_preferred() -> TestResult {
    let temp = tempfile::tempdir().map_err(|err| err.to_string())?;
    let jdk = temp.path().join("jdk-21");
    fs::create_dir_all(&jdk).map_err(|err| err.to_string())?;
    fs::write(jdk.join("release"), "JAVA_VERSION=\"21.0.1\"\n").map_err(|err| err.to_string())?;
    let config = HarnessConfig {
        java_home: Some(jdk.clone()),
        ..HarnessConfig::default()
    };
    let store: MemoryPropertyStore = [("JAVA_HOME", "/nowhere")].into_iter().collect();

    let runtime = config.java_runtime(&store).map_err(|err| err.to_string())?;

    if runtime.version.major != 21 || runtime.jdk_home() != jdk.as_path() {
        return Err("configured java_home not used".to_string());
    }
    Ok(())
}
