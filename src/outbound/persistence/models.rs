//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and are
//! never exposed to the domain; conversions into domain entities happen here.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::{Coupon, Offer};

use super::schema::{coupon_codes, offers};

/// Row struct for reading from the offers table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = offers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct OfferRow {
    pub id: i32,
    pub restaurant: String,
    pub description: String,
    pub expires: NaiveDate,
    pub created_at: NaiveDateTime,
}

impl From<OfferRow> for Offer {
    fn from(row: OfferRow) -> Self {
        Offer {
            id: row.id,
            restaurant: row.restaurant,
            description: row.description,
            expires: row.expires,
            created_at: row.created_at.and_utc(),
        }
    }
}

/// Insertable struct for creating offer records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = offers)]
pub(crate) struct NewOfferRow<'a> {
    pub restaurant: &'a str,
    pub description: &'a str,
    pub expires: NaiveDate,
    pub created_at: NaiveDateTime,
}

/// Row struct for reading from the coupon_codes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = coupon_codes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct CouponRow {
    pub id: i32,
    pub offer_id: Option<i32>,
    pub restaurant: String,
    pub description: String,
    pub code: String,
    pub expires: NaiveDate,
    pub created_at: NaiveDateTime,
    pub redeemed_at: Option<NaiveDateTime>,
    pub redeemed_by: Option<String>,
}

impl From<CouponRow> for Coupon {
    fn from(row: CouponRow) -> Self {
        Coupon {
            id: row.id,
            offer_id: row.offer_id,
            restaurant: row.restaurant,
            description: row.description,
            code: row.code,
            expires: row.expires,
            created_at: row.created_at.and_utc(),
            redeemed_at: row.redeemed_at.map(|at| at.and_utc()),
            redeemed_by: row.redeemed_by,
        }
    }
}

/// Insertable struct for creating coupon records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = coupon_codes)]
pub(crate) struct NewCouponRow<'a> {
    pub offer_id: Option<i32>,
    pub restaurant: &'a str,
    pub description: &'a str,
    pub code: &'a str,
    pub expires: NaiveDate,
    pub created_at: NaiveDateTime,
}

/// Changeset applied by the conditional redemption update. `redeemed_by` is
/// optional so a blank redeemer name leaves the column untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = coupon_codes)]
pub(crate) struct CouponRedemption<'a> {
    pub redeemed_at: NaiveDateTime,
    pub redeemed_by: Option<&'a str>,
}
