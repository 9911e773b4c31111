//! Test data generators for synthetic radar rasters.
//!
//! These generators create predictable, verifiable RGBA patterns that mimic
//! the reflectivity composite: a pure black no-data background with coloured
//! echoes.

use std::io::Cursor;

use image::{ImageBuffer, ImageOutputFormat, Rgba};

/// Colour used for synthetic echoes (light green, a typical 20 dBZ shade).
pub const ECHO_COLOR: [u8; 4] = [1, 197, 1, 255];

/// Creates a radar-like RGBA raster.
///
/// Every pixel is black (no data) except a filled square echo covering the
/// middle third of the image in both directions.
///
/// # Returns
///
/// A `Vec<u8>` of `width * height * 4` bytes in row-major order.
///
/// # Example
///
/// ```
/// use test_utils::create_radar_raster;
///
/// let pixels = create_radar_raster(9, 9);
/// assert_eq!(pixels.len(), 9 * 9 * 4);
/// assert_eq!(&pixels[0..4], &[0, 0, 0, 255]);
/// ```
pub fn create_radar_raster(width: usize, height: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for row in 0..height {
        for col in 0..width {
            let in_echo = (width / 3..2 * width / 3).contains(&col)
                && (height / 3..2 * height / 3).contains(&row);
            if in_echo {
                pixels.extend_from_slice(&ECHO_COLOR);
            } else {
                pixels.extend_from_slice(&[0, 0, 0, 255]);
            }
        }
    }
    pixels
}

/// Creates a raster filled with a single RGBA colour.
pub fn create_solid_raster(width: usize, height: usize, color: [u8; 4]) -> Vec<u8> {
    color.repeat(width * height)
}

/// Encodes RGBA pixels as PNG bytes, the way the composite is served.
///
/// # Panics
///
/// Panics if `pixels` does not hold exactly `width * height * 4` bytes.
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Vec<u8> {
    let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_raw(width, height, pixels.to_vec()).expect("pixel buffer size mismatch");

    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageOutputFormat::Png)
        .expect("PNG encoding failed");
    out.into_inner()
}
