//! Radar product selection and archive paths.
//!
//! The Iowa Environmental Mesonet archives the national base reflectivity
//! composite every five minutes as
//! `{base}/{YYYY}/{MM}/{DD}/GIS/uscomp/n0q_{YYYYMMDDHHmm}.png`, with a `.wld`
//! world file beside it.

use chrono::{DateTime, Utc};
use meso_common::resolve_product_time;
use serde::Serialize;

/// Default archive root.
pub const DEFAULT_ARCHIVE_BASE_URL: &str = "https://mesonet.agron.iastate.edu/archive/data";

/// Product family name within the archive.
const PRODUCT_PREFIX: &str = "n0q";

/// A single composite in the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RadarProduct {
    valid_time: DateTime<Utc>,
    base_url: String,
}

impl RadarProduct {
    /// The most recent composite at or before `now`.
    pub fn latest_at(now: DateTime<Utc>, base_url: &str) -> Self {
        Self {
            valid_time: resolve_product_time(now),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Product valid time (UTC, minute divisible by five).
    pub fn valid_time(&self) -> DateTime<Utc> {
        self.valid_time
    }

    /// Timestamp used in product file names, `YYYYMMDDHHmm`.
    pub fn timestamp(&self) -> String {
        self.valid_time.format("%Y%m%d%H%M").to_string()
    }

    /// Human-readable valid time, e.g. `2024-01-05 20:45`.
    pub fn display_time(&self) -> String {
        self.valid_time.format("%Y-%m-%d %H:%M").to_string()
    }

    /// URL of the PNG raster.
    pub fn image_url(&self) -> String {
        format!("{}.png", self.url_stem())
    }

    /// URL of the world file.
    pub fn world_file_url(&self) -> String {
        format!("{}.wld", self.url_stem())
    }

    fn url_stem(&self) -> String {
        format!(
            "{}/{}/GIS/uscomp/{}_{}",
            self.base_url,
            self.valid_time.format("%Y/%m/%d"),
            PRODUCT_PREFIX,
            self.timestamp()
        )
    }
}
