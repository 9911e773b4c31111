//! Radar composite handling.
//!
//! - [`product`]: which 5-minute `n0q` composite to fetch and where it lives
//! - [`world_file`]: the six-coefficient affine georeference sidecar
//! - [`align`]: geographic extent and exact-black no-data masking
//!
//! Nothing here performs I/O; the caller fetches bytes and hands them in.

pub mod align;
pub mod product;
pub mod world_file;

pub use align::{align, mask_no_data, AlphaMaskedImage, RawImage};
pub use product::{RadarProduct, DEFAULT_ARCHIVE_BASE_URL};
pub use world_file::GeoTransform;
