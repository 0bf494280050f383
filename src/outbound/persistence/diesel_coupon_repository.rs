//! SQLite-backed [`CouponRepository`] implementation using Diesel.
//!
//! Two guarantees live here rather than in the service: the unique index on
//! the code column rejects duplicate codes at insert time, and redemption is
//! a conditional update filtered on `redeemed_at IS NULL` so concurrent
//! redemption attempts cannot both report success.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::ports::{CouponRepository, RepositoryError};
use crate::domain::{Coupon, NewCoupon};

use super::models::{CouponRedemption, CouponRow, NewCouponRow};
use super::pool::DbPool;
use super::schema::coupon_codes;
use super::{map_diesel_error, map_pool_error, run_blocking};

/// Diesel-backed implementation of the [`CouponRepository`] port.
#[derive(Clone)]
pub struct DieselCouponRepository {
    pool: DbPool,
}

impl DieselCouponRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CouponRepository for DieselCouponRepository {
    async fn insert(&self, coupon: NewCoupon) -> Result<Coupon, RepositoryError> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = pool.get().map_err(map_pool_error)?;
            let row: CouponRow = diesel::insert_into(coupon_codes::table)
                .values(NewCouponRow {
                    offer_id: coupon.offer_id,
                    restaurant: &coupon.restaurant,
                    description: &coupon.description,
                    code: &coupon.code,
                    expires: coupon.expires,
                    created_at: Utc::now().naive_utc(),
                })
                .returning(CouponRow::as_returning())
                .get_result(&mut conn)
                .map_err(map_diesel_error)?;
            Ok(row.into())
        })
        .await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, RepositoryError> {
        let pool = self.pool.clone();
        let code = code.to_owned();
        run_blocking(move || {
            let mut conn = pool.get().map_err(map_pool_error)?;
            let row: Option<CouponRow> = coupon_codes::table
                .filter(coupon_codes::code.eq(&code))
                .select(CouponRow::as_select())
                .first(&mut conn)
                .optional()
                .map_err(map_diesel_error)?;
            Ok(row.map(Coupon::from))
        })
        .await
    }

    async fn recent(&self, limit: i64) -> Result<Vec<Coupon>, RepositoryError> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = pool.get().map_err(map_pool_error)?;
            let rows: Vec<CouponRow> = coupon_codes::table
                .order((coupon_codes::created_at.desc(), coupon_codes::id.desc()))
                .limit(limit)
                .select(CouponRow::as_select())
                .load(&mut conn)
                .map_err(map_diesel_error)?;
            Ok(rows.into_iter().map(Coupon::from).collect())
        })
        .await
    }

    async fn mark_redeemed(
        &self,
        code: &str,
        redeemed_at: DateTime<Utc>,
        redeemed_by: Option<&str>,
    ) -> Result<u64, RepositoryError> {
        let pool = self.pool.clone();
        let code = code.to_owned();
        let redeemed_by = redeemed_by.map(str::to_owned);
        run_blocking(move || {
            let mut conn = pool.get().map_err(map_pool_error)?;
            let updated = diesel::update(
                coupon_codes::table.filter(
                    coupon_codes::code
                        .eq(&code)
                        .and(coupon_codes::redeemed_at.is_null()),
                ),
            )
            .set(CouponRedemption {
                redeemed_at: redeemed_at.naive_utc(),
                redeemed_by: redeemed_by.as_deref(),
            })
            .execute(&mut conn)
            .map_err(map_diesel_error)?;
            Ok(updated as u64)
        })
        .await
    }
}
