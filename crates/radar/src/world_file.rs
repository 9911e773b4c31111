//! World file parsing.
//!
//! A world file holds six whitespace-separated coefficients of the affine
//! transform from pixel (col, row) to geographic (x, y):
//!
//! ```text
//! x = ulx + col * pixel_size_x + row * rotation_x
//! y = uly + col * rotation_y   + row * pixel_size_y
//! ```
//!
//! in the order `pixel_size_x, rotation_y, rotation_x, pixel_size_y, ulx, uly`.

use meso_common::{BoundingBox, MesoError, MesoResult};
use serde::Serialize;
use tracing::debug;

/// Number of coefficients in a world file.
pub const COEFFICIENT_COUNT: usize = 6;

/// Affine pixel-to-geographic transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoTransform {
    pub pixel_size_x: f64,
    pub rotation_y: f64,
    pub rotation_x: f64,
    pub pixel_size_y: f64,
    pub upper_left_x: f64,
    pub upper_left_y: f64,
}

impl GeoTransform {
    /// Parse world-file text.
    ///
    /// Fails with `MalformedGeoreference` when a value is not a finite number,
    /// a pixel size is zero or fewer than six are present. Anything after the sixth value is ignored.
    pub fn parse(text: &str) -> MesoResult<Self> {
        let values = text
            .split_whitespace()
            .map(|v| {
                v.parse::<f64>().map_err(|_| {
                    MesoError::MalformedGeoreference(format!("'{}' is not a number", v))
                })
            })
            .collect::<MesoResult<Vec<f64>>>()?;

        if values.len() > COEFFICIENT_COUNT {
            debug!(
                count = values.len(),
                "World file has extra values, using the first six"
            );
        }

        Self::from_coefficients(&values)
    }

    /// Build from coefficients in world-file order.
    ///
    /// Every coefficient must be finite and neither pixel size may be zero.
    pub fn from_coefficients(values: &[f64]) -> MesoResult<Self> {
        match values {
            [pixel_size_x, rotation_y, rotation_x, pixel_size_y, upper_left_x, upper_left_y, ..] => {
                if let Some(bad) = values[..COEFFICIENT_COUNT].iter().find(|v| !v.is_finite()) {
                    return Err(MesoError::MalformedGeoreference(format!(
                        "coefficient {} is not finite",
                        bad
                    )));
                }
                if *pixel_size_x == 0.0 || *pixel_size_y == 0.0 {
                    return Err(MesoError::MalformedGeoreference(format!(
                        "pixel size {} x {} is degenerate",
                        pixel_size_x, pixel_size_y
                    )));
                }

                Ok(Self {
                    pixel_size_x: *pixel_size_x,
                    rotation_y: *rotation_y,
                    rotation_x: *rotation_x,
                    pixel_size_y: *pixel_size_y,
                    upper_left_x: *upper_left_x,
                    upper_left_y: *upper_left_y,
                })
            }
            _ => Err(MesoError::MalformedGeoreference(format!(
                "expected {} coefficients, found {}",
                COEFFICIENT_COUNT,
                values.len()
            ))),
        }
    }

    /// True when both rotation terms are exactly zero.
    pub fn is_axis_aligned(&self) -> bool {
        self.rotation_x == 0.0 && self.rotation_y == 0.0
    }

    /// Extent covered by a `width` x `height` raster.
    ///
    /// `pixel_size_y` is negative for north-up rasters, so `min_y` lies below
    /// the upper-left corner. Rotation terms are not applied; callers reject
    /// rotated transforms first.
    pub fn extent(&self, width: u32, height: u32) -> BoundingBox {
        let far_x = self.upper_left_x + f64::from(width) * self.pixel_size_x;
        let far_y = self.upper_left_y + f64::from(height) * self.pixel_size_y;

        BoundingBox::new(
            self.upper_left_x.min(far_x),
            far_y.min(self.upper_left_y),
            self.upper_left_x.max(far_x),
            far_y.max(self.upper_left_y),
        )
    }
}
