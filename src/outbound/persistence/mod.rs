//! SQLite persistence adapters behind the domain repository ports.
//!
//! The schema is created by embedded migrations run explicitly from
//! [`initialise`] before the server starts serving traffic; nothing happens
//! implicitly at import time. The same call seeds one example offer when the
//! offers table is empty, mirroring first-boot behaviour.

mod diesel_coupon_repository;
mod diesel_offer_repository;
pub(crate) mod models;
pub mod pool;
pub mod schema;

pub use diesel_coupon_repository::DieselCouponRepository;
pub use diesel_offer_repository::DieselOfferRepository;
pub use pool::{DbPool, PoolConfig, PoolError};

use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::domain::ports::RepositoryError;

use models::NewOfferRow;
use schema::offers;

/// Migrations compiled into the binary so deployments are a single file.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while preparing the database at startup.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// The connection pool could not be built or checked out.
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// Running the embedded migrations failed.
    #[error("failed to run migrations: {message}")]
    Migration { message: String },

    /// Inserting the seed offer failed.
    #[error("failed to seed offers: {message}")]
    Seed { message: String },
}

/// Build the pool, run pending migrations, and seed the offers table if it is
/// empty. Idempotent: safe to call on every boot.
pub fn initialise(database_url: &str) -> Result<DbPool, SetupError> {
    let pool = DbPool::new(PoolConfig::new(database_url))?;
    let mut conn = pool.get()?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| SetupError::Migration {
            message: err.to_string(),
        })?;
    seed_if_empty(&mut conn)?;

    info!(database_url, "database initialised");
    Ok(pool)
}

fn seed_if_empty(conn: &mut SqliteConnection) -> Result<(), SetupError> {
    let seed_error = |message: String| SetupError::Seed { message };

    let existing: i64 = offers::table
        .count()
        .get_result(conn)
        .map_err(|err| seed_error(err.to_string()))?;
    if existing > 0 {
        return Ok(());
    }

    let expires = NaiveDate::from_ymd_opt(2025, 11, 5)
        .ok_or_else(|| seed_error("invalid seed expiry date".into()))?;
    diesel::insert_into(offers::table)
        .values(NewOfferRow {
            restaurant: "Chipotle",
            description: "Free chips",
            expires,
            created_at: Utc::now().naive_utc(),
        })
        .execute(conn)
        .map_err(|err| seed_error(err.to_string()))?;

    info!("seeded example offer");
    Ok(())
}

/// Map pool errors to repository errors.
pub(crate) fn map_pool_error(error: PoolError) -> RepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            RepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to repository errors. Unique-constraint violations get
/// their own variant so the issuing service can retry code generation.
pub(crate) fn map_diesel_error(error: diesel::result::Error) -> RepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            RepositoryError::DuplicateCode
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            RepositoryError::connection("database connection closed")
        }
        DieselError::NotFound => RepositoryError::query("record not found"),
        _ => RepositoryError::query("database error"),
    }
}

/// Run a blocking Diesel closure on the tokio blocking pool.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, RepositoryError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, RepositoryError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|err| RepositoryError::query(format!("blocking task failed: {err}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("timed out"));

        assert!(matches!(repo_err, RepositoryError::Connection { .. }));
        assert!(repo_err.to_string().contains("timed out"));
    }

    #[rstest]
    fn unique_violation_maps_to_duplicate_code() {
        let diesel_err = diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new("UNIQUE constraint failed: coupon_codes.code".to_string()),
        );

        assert_eq!(map_diesel_error(diesel_err), RepositoryError::DuplicateCode);
    }

    #[rstest]
    fn not_found_maps_to_query_error() {
        let repo_err = map_diesel_error(diesel::result::Error::NotFound);

        assert!(matches!(repo_err, RepositoryError::Query { .. }));
        assert!(repo_err.to_string().contains("record not found"));
    }
}
