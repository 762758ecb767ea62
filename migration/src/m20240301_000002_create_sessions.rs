use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

use crate::m20240301_000001_create_users::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Sessions live for 15 minutes unless logout deletes them first.
        let (id_default, expires_default) = match manager.get_database_backend() {
            DatabaseBackend::Postgres => (
                "DEFAULT gen_random_uuid()::text",
                "DEFAULT (now() + interval '15 minutes')",
            ),
            DatabaseBackend::Sqlite => (
                "DEFAULT (lower(hex(randomblob(16))))",
                "DEFAULT (datetime('now', '+15 minutes'))",
            ),
            DatabaseBackend::MySql => (
                "DEFAULT (uuid())",
                "DEFAULT (now() + interval 15 minute)",
            ),
        };

        manager
            .create_table(
                Table::create()
                    .if_not_exists()
                    .table(Session::Table)
                    .col(
                        ColumnDef::new(Session::Id)
                            .text()
                            .not_null()
                            .primary_key()
                            .extra(id_default),
                    )
                    .col(ColumnDef::new(Session::UserId).text().not_null())
                    .col(
                        ColumnDef::new(Session::Expires)
                            .timestamp()
                            .not_null()
                            .extra(expires_default),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Session::Table, Session::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .take(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Session::Table)
                    .col(Session::UserId)
                    .name("idx_sessions_user_id")
                    .take(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Session::Table).take())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Session {
    #[sea_orm(iden = "sessions")]
    Table,
    Id,
    UserId,
    Expires,
}
