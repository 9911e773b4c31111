//! Common types and utilities shared across the discussion mapper crates.

pub mod bbox;
pub mod error;
pub mod geo;
pub mod time;

pub use bbox::BoundingBox;
pub use error::{MesoError, MesoResult};
pub use geo::{GeoPoint, Polygon};
pub use time::{
    resolve_product_time, ValidityWindow, DEFAULT_UTC_OFFSET_HOURS, PRODUCT_INTERVAL_MINUTES,
    VALIDITY_NOT_ACCESSIBLE,
};
