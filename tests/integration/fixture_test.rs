//! Seeding and migration strategies of the fixture provisioner

use std::time::Duration;

use serial_test::serial;
use session_harness::config::{DatabaseConfig, MigrationConfig, MigrationStrategy};
use session_harness::fixture::seed::{count_users, find_user, seed_user};
use session_harness::fixture::{CommandMigrations, DatabaseTarget, Migrations, ProvisionError, Provisioner};
use session_harness::protocol::Credential;
use session_harness::testing::setup;

fn target() -> DatabaseTarget {
    DatabaseTarget::parse("postgres://localhost/harness_fixture", "postgres").unwrap()
}

fn shell(script: &str) -> CommandMigrations {
    CommandMigrations::new(
        vec!["sh".to_string(), "-c".to_string(), script.to_string()],
        None,
    )
    .unwrap()
}

#[actix_web::test]
async fn test_seed_inserts_one_confirmed_user() {
    let db = setup::database().await;

    let user = seed_user(&db, &Credential::fixture()).await.unwrap();

    assert_eq!(user.email, "sam.raker+1@gmail.com");
    assert!(user.confirmed);
    assert_eq!(count_users(&db).await.unwrap(), 1);
}

#[actix_web::test]
async fn test_seeded_user_can_be_found_by_email() {
    let db = setup::database().await;
    seed_user(&db, &Credential::fixture()).await.unwrap();

    let found = find_user(&db, "sam.raker+1@gmail.com").await.unwrap();
    assert!(found.is_some_and(|user| user.confirmed));
    assert!(find_user(&db, "nobody@example.invalid").await.unwrap().is_none());
}

#[actix_web::test]
async fn test_seeding_twice_fails() {
    let db = setup::database().await;
    seed_user(&db, &Credential::fixture()).await.unwrap();

    let result = seed_user(&db, &Credential::fixture()).await;

    assert!(matches!(result, Err(ProvisionError::Seed(_))));
    assert_eq!(count_users(&db).await.unwrap(), 1);
}

#[actix_web::test]
async fn test_command_migrations_receive_database_url() {
    let migrations = shell("test \"$DATABASE_URL\" = \"postgres://localhost/harness_fixture\"");

    migrations.run(&target()).await.unwrap();
}

#[actix_web::test]
async fn test_failing_migration_command_is_fatal() {
    let result = shell("exit 3").run(&target()).await;

    match result {
        Err(error @ ProvisionError::Migrate(_)) => {
            assert_eq!(error.step(), "migrate");
            assert!(error.to_string().contains("sh -c exit 3"), "{}", error);
        }
        other => panic!("expected Migrate, got {:?}", other),
    }
}

#[actix_web::test]
async fn test_missing_migration_tool_is_fatal() {
    let migrations = CommandMigrations::new(vec!["session-harness-no-such-tool".to_string()], None).unwrap();

    let result = migrations.run(&target()).await;

    assert!(matches!(result, Err(ProvisionError::Migrate(message)) if message.contains("failed to start")));
}

/// A failing first step stops provisioning before migrations run
#[actix_web::test]
async fn test_unreachable_admin_database_aborts_before_migrating() {
    let dir = tempfile::TempDir::new().unwrap();
    let marker = dir.path().join("migrated");
    let migrations = shell(&format!("touch '{}'", marker.display()));

    let target = DatabaseTarget::parse("postgres://127.0.0.1:1/harness_fixture", "postgres").unwrap();
    let provisioner = Provisioner::new(target, Box::new(migrations)).connect_timeout(Duration::from_secs(1));

    let result = provisioner.provision().await;

    match result {
        Err(error @ ProvisionError::Connect { .. }) => {
            assert_eq!(error.step(), "connect");
            assert!(error.to_string().contains("`postgres`"), "{}", error);
        }
        other => panic!("expected Connect, got {:?}", other),
    }
    assert!(!marker.exists(), "migrations ran after a failed connect");
}

#[test]
#[serial]
fn test_provisioner_requires_database_url() {
    unsafe { std::env::remove_var("DATABASE_URL") };

    let result = Provisioner::from_config(&DatabaseConfig::default());

    assert!(matches!(result, Err(ProvisionError::MissingDatabaseUrl)));
}

#[test]
#[serial]
fn test_provisioner_falls_back_to_database_url() {
    unsafe { std::env::set_var("DATABASE_URL", "postgres://sam@localhost:5432/tmt") };

    let provisioner = Provisioner::from_config(&DatabaseConfig::default()).unwrap();

    assert_eq!(provisioner.target().name(), "tmt");
    assert_eq!(provisioner.target().admin_url(), "postgres://sam@localhost:5432/postgres");
    assert_eq!(provisioner.credential(), &Credential::fixture());

    unsafe { std::env::remove_var("DATABASE_URL") };
}

#[test]
fn test_provisioner_rejects_non_postgres_target() {
    let config = DatabaseConfig {
        url: "sqlite://fixture.db".to_string(),
        migrations: MigrationConfig {
            strategy: MigrationStrategy::Embedded,
            ..MigrationConfig::default()
        },
        ..DatabaseConfig::default()
    };

    let result = Provisioner::from_config(&config);

    assert!(matches!(result, Err(ProvisionError::InvalidTarget(_))));
}
