//! Fixture user seeding

use sea_orm::sea_query::{Alias, Asterisk, Expr, Query};
use sea_orm::{ConnectionTrait, DbErr};
use session_harness_migration::User;

use crate::protocol::Credential;

use super::ProvisionError;

/// User row as read back after seeding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededUser {
    pub email: String,
    pub confirmed: bool,
}

/// Inserts exactly one confirmed user for `credential`
///
/// The secret is stored as given; the service hashes it on its side of the
/// password check.
#[tracing::instrument(skip_all, fields(client_id = %credential.client_id))]
pub async fn seed_user<C: ConnectionTrait>(db: &C, credential: &Credential) -> Result<SeededUser, ProvisionError> {
    let insert = Query::insert()
        .into_table(User::Table)
        .columns([User::Email, User::Password, User::Confirmed])
        .values_panic([
            credential.client_id.clone().into(),
            credential.client_secret.clone().into(),
            true.into(),
        ])
        .to_owned();

    let result = db.execute(db.get_database_backend().build(&insert)).await?;

    if result.rows_affected() != 1 {
        return Err(ProvisionError::SeedRowCount(result.rows_affected()));
    }

    match find_user(db, &credential.client_id).await? {
        Some(user) if user.confirmed => {
            tracing::info!("fixture user seeded");
            Ok(user)
        }
        _ => Err(ProvisionError::SeedNotConfirmed(credential.client_id.clone())),
    }
}

pub async fn find_user<C: ConnectionTrait>(db: &C, email: &str) -> Result<Option<SeededUser>, DbErr> {
    let select = Query::select()
        .columns([User::Email, User::Confirmed])
        .from(User::Table)
        .and_where(Expr::col(User::Email).eq(email))
        .to_owned();

    let Some(row) = db.query_one(db.get_database_backend().build(&select)).await? else {
        return Ok(None);
    };

    Ok(Some(SeededUser {
        email: row.try_get("", "email")?,
        confirmed: row.try_get("", "confirmed")?,
    }))
}

pub async fn count_users<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
    let select = Query::select()
        .expr_as(Expr::col(Asterisk).count(), Alias::new("total"))
        .from(User::Table)
        .to_owned();

    let total: i64 = match db.query_one(db.get_database_backend().build(&select)).await? {
        Some(row) => row.try_get("", "total")?,
        None => 0,
    };

    Ok(total.max(0) as u64)
}
