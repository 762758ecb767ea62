//! Configuration loading, precedence and validation

use std::env;
use std::fs;

use serial_test::serial;
use session_harness::config::*;
use tempfile::TempDir;

mod utils {
    /// Clean up environment variables the loader reads
    pub fn clean_env_vars() {
        let keys: Vec<String> = std::env::vars()
            .filter(|(k, _)| k.starts_with("SESSION_HARNESS__"))
            .map(|(k, _)| k)
            .collect();

        for key in keys {
            unsafe { std::env::remove_var(&key) };
        }

        unsafe {
            std::env::remove_var("HARNESS_ENV");
            std::env::remove_var("DATABASE_URL");
        }
    }
}

fn config_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

// =============================================================================
// Loading
// =============================================================================

#[test]
#[serial]
fn test_load_repository_config() {
    utils::clean_env_vars();

    let config = load().unwrap();

    assert_eq!(config.service.base_url, "http://localhost:8080");
    assert_eq!(config.service.request_timeout, 30);
    assert_eq!(config.service.paths.authorize, "/authorize");
    assert_eq!(config.service.paths.private, "/private");
    assert_eq!(config.service.paths.logout, "/logout");
    assert_eq!(config.service.paths.health, "/");
    assert_eq!(config.verifier.rejection_status, 400);
    assert!(config.verifier.scenarios.is_empty());
    assert_eq!(config.database.admin_database, "postgres");
    assert_eq!(config.database.migrations.strategy, MigrationStrategy::Command);
    assert_eq!(config.database.migrations.command, vec!["diesel", "migration", "run"]);
    // development.toml raises the harness's own log level
    assert_eq!(config.observability.log_level, "session_harness=debug,info");
}

#[test]
#[serial]
fn test_missing_files_fall_back_to_defaults() {
    utils::clean_env_vars();
    let dir = config_dir(&[]);

    let config = load_from(dir.path()).unwrap();

    assert_eq!(config.service.base_url, "http://localhost:8080");
    assert_eq!(config.readiness.max_attempts, 10);
    assert_eq!(config.observability.format, LogFormat::Pretty);
}

#[test]
#[serial]
fn test_environment_file_overrides_default() {
    utils::clean_env_vars();
    let dir = config_dir(&[
        ("default.toml", "[service]\nbase_url = \"http://default:8080\"\n"),
        ("ci.toml", "[service]\nbase_url = \"http://ci:8080\"\n\n[observability]\nformat = \"json\"\n"),
    ]);

    unsafe { env::set_var("HARNESS_ENV", "ci") };
    let config = load_from(dir.path()).unwrap();
    utils::clean_env_vars();

    assert_eq!(config.service.base_url, "http://ci:8080");
    assert_eq!(config.observability.format, LogFormat::Json);
}

#[test]
#[serial]
fn test_local_file_overrides_environment_file() {
    utils::clean_env_vars();
    let dir = config_dir(&[
        ("development.toml", "[verifier]\nrejection_status = 401\n"),
        ("local.toml", "[verifier]\nrejection_status = 403\n"),
    ]);

    let config = load_from(dir.path()).unwrap();

    assert_eq!(config.verifier.rejection_status, 403);
}

// =============================================================================
// Environment variable overrides
// =============================================================================

#[test]
#[serial]
fn test_environment_variable_override() {
    utils::clean_env_vars();
    let dir = config_dir(&[("local.toml", "[service]\nbase_url = \"http://local:8080\"\n")]);

    unsafe {
        env::set_var("SESSION_HARNESS__SERVICE__BASE_URL", "http://env:9000");
        env::set_var("SESSION_HARNESS__SERVICE__REQUEST_TIMEOUT", "5");
        env::set_var("SESSION_HARNESS__READINESS__ENABLED", "false");
    }
    let config = load_from(dir.path()).unwrap();
    utils::clean_env_vars();

    assert_eq!(config.service.base_url, "http://env:9000");
    assert_eq!(config.service.request_timeout, 5);
    assert!(!config.readiness.enabled);
}

#[test]
#[serial]
fn test_list_values_from_environment() {
    utils::clean_env_vars();
    let dir = config_dir(&[]);

    unsafe {
        env::set_var("SESSION_HARNESS__VERIFIER__SCENARIOS", "authorize logout-invalidates");
        env::set_var("SESSION_HARNESS__DATABASE__MIGRATIONS__COMMAND", "sqlx migrate run");
    }
    let config = load_from(dir.path()).unwrap();
    utils::clean_env_vars();

    assert_eq!(config.verifier.scenarios, vec!["authorize", "logout-invalidates"]);
    assert_eq!(config.database.migrations.command, vec!["sqlx", "migrate", "run"]);
}

#[test]
#[serial]
fn test_database_url_fallback() {
    utils::clean_env_vars();
    let dir = config_dir(&[]);

    unsafe { env::set_var("DATABASE_URL", "postgres://localhost/tmt") };
    let config = load_from(dir.path()).unwrap();
    let resolved = config.database.resolve_url();
    utils::clean_env_vars();

    assert!(config.database.url.is_empty());
    assert_eq!(resolved.as_deref(), Some("postgres://localhost/tmt"));
}

#[test]
#[serial]
fn test_configured_url_wins_over_database_url() {
    utils::clean_env_vars();
    let dir = config_dir(&[("local.toml", "[database]\nurl = \"postgres://localhost/configured\"\n")]);

    unsafe { env::set_var("DATABASE_URL", "postgres://localhost/from_env") };
    let config = load_from(dir.path()).unwrap();
    let resolved = config.database.resolve_url();
    utils::clean_env_vars();

    assert_eq!(resolved.as_deref(), Some("postgres://localhost/configured"));
}

// =============================================================================
// Validation
// =============================================================================

#[test]
#[serial]
fn test_invalid_file_value_fails_loading() {
    utils::clean_env_vars();
    let dir = config_dir(&[("local.toml", "[service]\nrequest_timeout = 0\n")]);

    let result = load_from(dir.path());

    match result {
        Err(ConfigError::ValidationError(msg)) => assert!(msg.contains("request_timeout")),
        other => panic!("Expected ValidationError, got {:?}", other.map(|_| ())),
    }
}

#[test]
#[serial]
fn test_unknown_enum_value_fails_loading() {
    utils::clean_env_vars();
    let dir = config_dir(&[("local.toml", "[observability]\nformat = \"xml\"\n")]);

    assert!(matches!(load_from(dir.path()), Err(ConfigError::Load(_))));
}

#[test]
fn test_validation_relative_path() {
    let mut config = HarnessConfig::default();
    config.service.paths.logout = "logout".to_string();

    match config.validate() {
        Err(ConfigError::ValidationError(msg)) => assert!(msg.contains("service.paths.logout")),
        other => panic!("Expected ValidationError, got {:?}", other),
    }
}

#[test]
fn test_validation_rejection_status_must_be_client_error() {
    let mut config = HarnessConfig::default();
    config.verifier.rejection_status = 200;

    assert!(config.validate().is_err());
}

#[test]
fn test_validation_empty_migration_command() {
    let mut config = HarnessConfig::default();
    config.database.migrations.command.clear();

    assert!(config.validate().is_err());

    config.database.migrations.strategy = MigrationStrategy::Embedded;
    assert!(config.validate().is_ok());
}
