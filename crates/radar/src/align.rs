//! Georeferenced alignment and no-data masking of the composite raster.

use image::ImageFormat;
use meso_common::{BoundingBox, MesoError, MesoResult};
use tracing::debug;

use crate::world_file::GeoTransform;

/// The composite's no-data colour.
const NO_DATA_RGB: [u8; 3] = [0, 0, 0];

/// A decoded RGBA8 raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RawImage {
    /// Wrap an RGBA8 buffer of `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> MesoResult<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(MesoError::MalformedRaster(format!(
                "{}x{} RGBA raster needs {} bytes, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Decode PNG bytes (any colour type) to RGBA8.
    pub fn decode_png(bytes: &[u8]) -> MesoResult<Self> {
        let rgba = image::load_from_memory_with_format(bytes, ImageFormat::Png)
            .map_err(|e| MesoError::MalformedRaster(format!("PNG decode failed: {}", e)))?
            .to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::new(width, height, rgba.into_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// RGBA8 raster whose alpha marks no-data pixels transparent.
///
/// Alpha is 0 where RGB is exactly (0, 0, 0) and 255 everywhere else; RGB is
/// copied unchanged from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaMaskedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl AlphaMaskedImage {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA8 bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA value at (col, row), or `None` outside the raster.
    pub fn pixel(&self, col: u32, row: u32) -> Option<[u8; 4]> {
        if col >= self.width || row >= self.height {
            return None;
        }
        let i = (row as usize * self.width as usize + col as usize) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Number of opaque (data) pixels.
    pub fn opaque_count(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|p| p[3] == 255).count()
    }
}

/// Copy `raster`, setting alpha 0 on exact-black pixels and 255 elsewhere.
pub fn mask_no_data(raster: &RawImage) -> AlphaMaskedImage {
    let mut pixels = raster.pixels.clone();
    for px in pixels.chunks_exact_mut(4) {
        px[3] = if px[..3] == NO_DATA_RGB { 0 } else { 255 };
    }

    AlphaMaskedImage {
        width: raster.width,
        height: raster.height,
        pixels,
    }
}

/// Place `raster` geographically and mask its no-data background.
///
/// Rotated or sheared georeferences are rejected with
/// `UnsupportedGeoreference` instead of being drawn misplaced.
pub fn align(
    raster: &RawImage,
    transform: &GeoTransform,
) -> MesoResult<(AlphaMaskedImage, BoundingBox)> {
    if !transform.is_axis_aligned() {
        return Err(MesoError::UnsupportedGeoreference(format!(
            "rotation terms must be zero, got rotation_x={} rotation_y={}",
            transform.rotation_x, transform.rotation_y
        )));
    }

    let extent = transform.extent(raster.width, raster.height);
    let masked = mask_no_data(raster);

    debug!(
        width = raster.width,
        height = raster.height,
        min_x = extent.min_x,
        max_x = extent.max_x,
        min_y = extent.min_y,
        max_y = extent.max_y,
        opaque = masked.opaque_count(),
        "Aligned radar raster"
    );

    Ok((masked, extent))
}
