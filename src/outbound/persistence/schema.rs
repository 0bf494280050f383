//! Diesel table definitions for the SQLite schema.
//!
//! These definitions must match the embedded migrations exactly; Diesel uses
//! them for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Published offers. Append-only: rows are never updated or deleted.
    offers (id) {
        /// Primary key, assigned by SQLite.
        id -> Integer,
        /// Restaurant name shown to users and searched against.
        restaurant -> Text,
        /// Short human-readable description of the promotion.
        description -> Text,
        /// Calendar date after which issued coupons expire.
        expires -> Date,
        /// Record creation timestamp (UTC).
        created_at -> Timestamp,
    }
}

diesel::table! {
    /// Issued coupon codes. Mutated at most once, by redemption.
    coupon_codes (id) {
        /// Primary key, assigned by SQLite.
        id -> Integer,
        /// Weak back-reference to the originating offer.
        offer_id -> Nullable<Integer>,
        /// Restaurant name snapshotted from the offer at issuance.
        restaurant -> Text,
        /// Description snapshotted from the offer at issuance.
        description -> Text,
        /// Globally unique coupon code (enforced by a unique index).
        code -> Text,
        /// Expiry date snapshotted from the offer at issuance.
        expires -> Date,
        /// Record creation timestamp (UTC).
        created_at -> Timestamp,
        /// Redemption timestamp (UTC); set exactly once.
        redeemed_at -> Nullable<Timestamp>,
        /// Free-text name of whoever redeemed the coupon.
        redeemed_by -> Nullable<Text>,
    }
}

diesel::joinable!(coupon_codes -> offers (offer_id));
diesel::allow_tables_to_appear_in_same_query!(coupon_codes, offers);
