use sea_orm::DbErr;
use thiserror::Error;

/// Failure of a provisioning step; every variant aborts the run
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("No database URL configured (set database.url or DATABASE_URL)")]
    MissingDatabaseUrl,

    #[error("Invalid database target: {0}")]
    InvalidTarget(String),

    #[error("Failed to connect to database `{database}`: {source}")]
    Connect {
        database: String,
        #[source]
        source: DbErr,
    },

    #[error("Failed to close connection to database `{database}`: {source}")]
    Disconnect {
        database: String,
        #[source]
        source: DbErr,
    },

    #[error("Failed to drop database `{database}`: {source}")]
    Drop {
        database: String,
        #[source]
        source: DbErr,
    },

    #[error("Failed to create database `{database}`: {source}")]
    Create {
        database: String,
        #[source]
        source: DbErr,
    },

    #[error("Migrations failed: {0}")]
    Migrate(String),

    #[error("Failed to seed fixture user: {0}")]
    Seed(#[from] DbErr),

    #[error("Seeding inserted {0} rows instead of exactly one")]
    SeedRowCount(u64),

    #[error("Seeded user `{0}` is missing or not confirmed")]
    SeedNotConfirmed(String),
}

impl ProvisionError {
    /// Provisioning step the error belongs to
    pub fn step(&self) -> &'static str {
        match self {
            ProvisionError::MissingDatabaseUrl | ProvisionError::InvalidTarget(_) => "configure",
            ProvisionError::Connect { .. } => "connect",
            ProvisionError::Disconnect { .. } => "disconnect",
            ProvisionError::Drop { .. } => "drop",
            ProvisionError::Create { .. } => "create",
            ProvisionError::Migrate(_) => "migrate",
            ProvisionError::Seed(_)
            | ProvisionError::SeedRowCount(_)
            | ProvisionError::SeedNotConfirmed(_) => "seed",
        }
    }
}
