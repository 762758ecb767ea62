use std::path::PathBuf;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use session_harness_migration::{Migrator, MigratorTrait};
use tokio::process::Command;

use crate::config::{MigrationConfig, MigrationStrategy};

use super::{admin, DatabaseTarget, ProvisionError};

/// Brings a freshly created database to the current schema
#[async_trait]
pub trait Migrations: Send + Sync {
    /// Short description for logs
    fn describe(&self) -> String;

    async fn run(&self, target: &DatabaseTarget) -> Result<(), ProvisionError>;
}

/// Builds the migration strategy selected in the configuration
pub fn from_config(config: &MigrationConfig) -> Result<Box<dyn Migrations>, ProvisionError> {
    match config.strategy {
        MigrationStrategy::Command => Ok(Box::new(CommandMigrations::new(
            config.command.clone(),
            config.working_dir.clone(),
        )?)),
        MigrationStrategy::Embedded => Ok(Box::new(EmbeddedMigrations)),
    }
}

/// Runs the service's own migration tool with DATABASE_URL pointing at the
/// target
#[derive(Debug, Clone)]
pub struct CommandMigrations {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl CommandMigrations {
    pub fn new(command: Vec<String>, working_dir: Option<PathBuf>) -> Result<Self, ProvisionError> {
        let mut parts = command.into_iter();
        let program = parts
            .next()
            .filter(|program| !program.trim().is_empty())
            .ok_or_else(|| ProvisionError::Migrate("migration command is empty".to_string()))?;

        Ok(Self {
            program,
            args: parts.collect(),
            working_dir,
        })
    }
}

#[async_trait]
impl Migrations for CommandMigrations {
    fn describe(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[tracing::instrument(skip_all, fields(command = %self.describe()))]
    async fn run(&self, target: &DatabaseTarget) -> Result<(), ProvisionError> {
        let mut command = Command::new(&self.program);
        command.args(&self.args).env("DATABASE_URL", target.url());

        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        let status = command.status().await.map_err(|e| {
            ProvisionError::Migrate(format!("failed to start `{}`: {}", self.describe(), e))
        })?;

        if !status.success() {
            return Err(ProvisionError::Migrate(format!(
                "`{}` exited with {}",
                self.describe(),
                status
            )));
        }

        tracing::info!("migrations applied");

        Ok(())
    }
}

/// Applies the bundled reference schema through sea-orm
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedMigrations;

impl EmbeddedMigrations {
    pub async fn apply(db: &DatabaseConnection) -> Result<(), ProvisionError> {
        Migrator::up(db, None)
            .await
            .map_err(|e| ProvisionError::Migrate(e.to_string()))
    }
}

#[async_trait]
impl Migrations for EmbeddedMigrations {
    fn describe(&self) -> String {
        "embedded reference schema".to_string()
    }

    #[tracing::instrument(skip_all, fields(database = %target.name()))]
    async fn run(&self, target: &DatabaseTarget) -> Result<(), ProvisionError> {
        let db = admin::connect(target.url(), target.name(), admin::DEFAULT_CONNECT_TIMEOUT).await?;

        Self::apply(&db).await?;
        admin::disconnect(db, target.name()).await?;

        tracing::info!("migrations applied");

        Ok(())
    }
}
