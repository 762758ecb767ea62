//! Fixture provisioner
//!
//! Drops and recreates the target database, migrates it and seeds the fixture
//! user. Every step is fatal on failure and nothing is retried. Running it
//! destroys all data in the target database.

pub mod admin;
pub mod error;
pub mod migrations;
pub mod seed;
pub mod target;

pub use error::ProvisionError;
pub use migrations::{CommandMigrations, EmbeddedMigrations, Migrations};
pub use seed::SeededUser;
pub use target::DatabaseTarget;

use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::protocol::Credential;

pub struct Provisioner {
    target: DatabaseTarget,
    force_drop: bool,
    connect_timeout: Duration,
    migrations: Box<dyn Migrations>,
    credential: Credential,
}

impl Provisioner {
    pub fn new(target: DatabaseTarget, migrations: Box<dyn Migrations>) -> Self {
        Self {
            target,
            force_drop: false,
            connect_timeout: admin::DEFAULT_CONNECT_TIMEOUT,
            migrations,
            credential: Credential::fixture(),
        }
    }

    /// Append `WITH (FORCE)` to the drop statement
    pub fn force_drop(mut self, force: bool) -> Self {
        self.force_drop = force;
        self
    }

    /// How long each connection attempt may take before the step fails
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn from_config(config: &DatabaseConfig) -> Result<Self, ProvisionError> {
        let url = config.resolve_url().ok_or(ProvisionError::MissingDatabaseUrl)?;
        let target = DatabaseTarget::parse(&url, &config.admin_database)?;
        let migrations = migrations::from_config(&config.migrations)?;

        Ok(Self::new(target, migrations)
            .force_drop(config.force_drop)
            .connect_timeout(config.connect_timeout_duration()))
    }

    pub fn target(&self) -> &DatabaseTarget {
        &self.target
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    #[tracing::instrument(skip(self), fields(database = %self.target.redacted(), migrations = %self.migrations.describe()))]
    pub async fn provision(&self) -> Result<SeededUser, ProvisionError> {
        let admin = admin::connect(
            self.target.admin_url(),
            self.target.admin_database(),
            self.connect_timeout,
        )
        .await?;

        admin::drop_database(&admin, self.target.name(), self.force_drop).await?;
        admin::create_database(&admin, self.target.name()).await?;

        // The admin session must be gone before the target is used.
        admin::disconnect(admin, self.target.admin_database()).await?;

        self.migrations.run(&self.target).await?;

        let db = admin::connect(self.target.url(), self.target.name(), self.connect_timeout).await?;
        let user = seed::seed_user(&db, &self.credential).await?;
        admin::disconnect(db, self.target.name()).await?;

        tracing::info!("fixture provisioned");

        Ok(user)
    }
}
