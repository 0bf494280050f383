//! SQLite-backed [`OfferRepository`] implementation using Diesel.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;

use crate::domain::ports::{OfferRepository, RepositoryError};
use crate::domain::{NewOffer, Offer};

use super::models::{NewOfferRow, OfferRow};
use super::pool::DbPool;
use super::schema::offers;
use super::{map_diesel_error, map_pool_error, run_blocking};

/// Diesel-backed implementation of the [`OfferRepository`] port.
#[derive(Clone)]
pub struct DieselOfferRepository {
    pool: DbPool,
}

impl DieselOfferRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OfferRepository for DieselOfferRepository {
    async fn insert(&self, offer: NewOffer) -> Result<Offer, RepositoryError> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = pool.get().map_err(map_pool_error)?;
            let row: OfferRow = diesel::insert_into(offers::table)
                .values(NewOfferRow {
                    restaurant: &offer.restaurant,
                    description: &offer.description,
                    expires: offer.expires,
                    created_at: Utc::now().naive_utc(),
                })
                .returning(OfferRow::as_returning())
                .get_result(&mut conn)
                .map_err(map_diesel_error)?;
            Ok(row.into())
        })
        .await
    }

    async fn list(&self, filter: Option<&str>) -> Result<Vec<Offer>, RepositoryError> {
        let pool = self.pool.clone();
        // SQLite LIKE is case-insensitive for ASCII, matching the original
        // ilike semantics for restaurant names.
        let pattern = filter.map(|needle| format!("%{needle}%"));
        run_blocking(move || {
            let mut conn = pool.get().map_err(map_pool_error)?;
            let mut query = offers::table
                .select(OfferRow::as_select())
                .order((offers::created_at.desc(), offers::id.desc()))
                .into_boxed();
            if let Some(pattern) = pattern {
                query = query.filter(offers::restaurant.like(pattern));
            }
            let rows: Vec<OfferRow> = query.load(&mut conn).map_err(map_diesel_error)?;
            Ok(rows.into_iter().map(Offer::from).collect())
        })
        .await
    }

    async fn find(&self, id: i32) -> Result<Option<Offer>, RepositoryError> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = pool.get().map_err(map_pool_error)?;
            let row: Option<OfferRow> = offers::table
                .find(id)
                .select(OfferRow::as_select())
                .first(&mut conn)
                .optional()
                .map_err(map_diesel_error)?;
            Ok(row.map(Offer::from))
        })
        .await
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = pool.get().map_err(map_pool_error)?;
            offers::table
                .count()
                .get_result(&mut conn)
                .map_err(map_diesel_error)
        })
        .await
    }
}
