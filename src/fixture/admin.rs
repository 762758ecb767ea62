//! DROP/CREATE DATABASE through the administrative connection

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};

use super::ProvisionError;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Opens a single-connection pool to `url`
///
/// A refused connection is retried until `timeout` runs out.
pub async fn connect(url: &str, database: &str, timeout: Duration) -> Result<DatabaseConnection, ProvisionError> {
    let mut options = ConnectOptions::new(url.to_string());
    options
        .max_connections(1)
        .connect_timeout(timeout)
        .acquire_timeout(timeout)
        .sqlx_logging(false);

    Database::connect(options)
        .await
        .map_err(|source| ProvisionError::Connect {
            database: database.to_string(),
            source,
        })
}

pub fn drop_statement(name: &str, force: bool) -> String {
    if force {
        format!("DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)", name)
    } else {
        format!("DROP DATABASE IF EXISTS \"{}\"", name)
    }
}

pub fn create_statement(name: &str) -> String {
    format!("CREATE DATABASE \"{}\"", name)
}

#[tracing::instrument(skip(admin))]
pub async fn drop_database(
    admin: &DatabaseConnection,
    name: &str,
    force: bool,
) -> Result<(), ProvisionError> {
    admin
        .execute_unprepared(&drop_statement(name, force))
        .await
        .map_err(|source| ProvisionError::Drop {
            database: name.to_string(),
            source,
        })?;

    tracing::info!("database dropped");

    Ok(())
}

#[tracing::instrument(skip(admin))]
pub async fn create_database(admin: &DatabaseConnection, name: &str) -> Result<(), ProvisionError> {
    admin
        .execute_unprepared(&create_statement(name))
        .await
        .map_err(|source| ProvisionError::Create {
            database: name.to_string(),
            source,
        })?;

    tracing::info!("database created");

    Ok(())
}

/// Closes a pool opened by [`connect`]
pub async fn disconnect(db: DatabaseConnection, database: &str) -> Result<(), ProvisionError> {
    db.close().await.map_err(|source| ProvisionError::Disconnect {
        database: database.to_string(),
        source,
    })
}
