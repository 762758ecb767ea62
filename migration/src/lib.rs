//! Reference schema of the session service.
//!
//! The service under test owns its migrations; this crate mirrors the tables
//! the harness relies on so a database can be brought up without the
//! service's own tooling.

pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_users;
mod m20240301_000002_create_sessions;

pub use m20240301_000001_create_users::User;
pub use m20240301_000002_create_sessions::Session;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_users::Migration),
            Box::new(m20240301_000002_create_sessions::Migration),
        ]
    }
}
