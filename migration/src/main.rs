use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    cli::run_cli(session_harness_migration::Migrator).await;
}
