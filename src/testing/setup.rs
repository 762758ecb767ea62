use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use session_harness_migration::{Migrator, MigratorTrait};

use crate::config::{HarnessConfig, ServiceConfig};

use super::FakeSessionService;

/// Returns an in-memory SQLite database with the reference schema applied
///
/// The pool holds a single connection; a second one would open a different,
/// empty in-memory database.
///
/// # Panics
/// Panics if the connection or the migrations fail.
pub async fn database() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to connect to in-memory database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Harness configuration pointed at `service`, with a short readiness backoff
pub fn config_for(service: &FakeSessionService) -> HarnessConfig {
    let mut config = HarnessConfig {
        service: ServiceConfig::with_base_url(service.base_url()),
        ..HarnessConfig::default()
    };
    config.service.request_timeout = 5;
    config.readiness.max_attempts = 3;
    config.readiness.initial_delay = 10;
    config.readiness.max_delay = 20;

    config
}
