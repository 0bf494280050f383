//! HTTP inbound adapter: actix handlers, templates, and error mapping.

pub mod coupons;
pub mod error;
pub mod health;
pub mod offers;
pub mod state;
pub mod templates;
pub mod validation;

pub use error::ApiResult;
