//! Config environment variable tests
//!
//! These tests verify that Config::from_env() correctly reads and applies
//! environment variable overrides. Note that Config::from_env() also loads
//! from .env file via dotenvy, so these tests focus on override behavior.
//!
//! Tests use #[serial] to prevent race conditions with shared env vars.

use edumate::config::{Config, LogFormat};
use serial_test::serial;
use std::env;

/// Every test needs the required API key in place
fn set_required_vars() {
    env::set_var("EDUMATE_API_KEY", "test_key");
}

#[test]
#[serial]
fn test_config_from_env_loads_successfully() {
    set_required_vars();

    let result = Config::from_env();
    assert!(
        result.is_ok(),
        "Config::from_env() should succeed with EDUMATE_API_KEY set"
    );
}

#[test]
#[serial]
fn test_config_missing_api_key_fails() {
    env::remove_var("EDUMATE_API_KEY");

    let result = Config::from_env();
    assert!(result.is_err(), "EDUMATE_API_KEY is required");

    set_required_vars();
}

#[test]
#[serial]
fn test_config_from_env_custom_base_url() {
    set_required_vars();
    env::set_var("EDUMATE_INFERENCE_URL", "https://custom.api.com");

    let config = Config::from_env().unwrap();
    assert_eq!(config.inference.base_url, "https://custom.api.com");

    env::remove_var("EDUMATE_INFERENCE_URL");
}

#[test]
#[serial]
fn test_config_from_env_default_base_url() {
    set_required_vars();
    env::remove_var("EDUMATE_INFERENCE_URL");

    let config = Config::from_env().unwrap();
    assert_eq!(config.inference.base_url, "http://localhost:8080");
}

#[test]
#[serial]
fn test_config_from_env_custom_database() {
    set_required_vars();
    env::set_var("DATABASE_PATH", "/custom/path.db");
    env::set_var("DATABASE_MAX_CONNECTIONS", "10");

    let config = Config::from_env().unwrap();
    assert_eq!(config.database.path.to_str().unwrap(), "/custom/path.db");
    assert_eq!(config.database.max_connections, 10);

    // Restore defaults
    env::remove_var("DATABASE_PATH");
    env::set_var("DATABASE_MAX_CONNECTIONS", "5");
}

#[test]
#[serial]
fn test_config_from_env_json_log_format() {
    set_required_vars();
    env::set_var("LOG_FORMAT", "json");

    let config = Config::from_env().unwrap();
    assert_eq!(config.logging.format, LogFormat::Json);

    // Restore default
    env::set_var("LOG_FORMAT", "pretty");
}

#[test]
#[serial]
fn test_config_from_env_custom_request_timeout() {
    set_required_vars();
    env::set_var("REQUEST_TIMEOUT_MS", "60000");

    let config = Config::from_env().unwrap();
    assert_eq!(config.request.timeout_ms, 60000);

    // Restore default
    env::set_var("REQUEST_TIMEOUT_MS", "30000");
}

#[test]
#[serial]
fn test_config_invalid_number_uses_default() {
    set_required_vars();
    env::set_var("DATABASE_MAX_CONNECTIONS", "not-a-number");

    let config = Config::from_env().unwrap();
    // Should fall back to default
    assert_eq!(config.database.max_connections, 5);

    // Restore default
    env::set_var("DATABASE_MAX_CONNECTIONS", "5");
}

#[test]
#[serial]
fn test_config_from_env_log_level() {
    set_required_vars();
    env::set_var("LOG_LEVEL", "debug");

    let config = Config::from_env().unwrap();
    assert_eq!(config.logging.level, "debug");

    // Restore default
    env::set_var("LOG_LEVEL", "info");
}
