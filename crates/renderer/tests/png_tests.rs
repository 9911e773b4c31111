//! Tests for PNG encoding of maps and masked radar rasters.
//!
//! Encoded output is decoded with the `image` crate to check the pixels
//! survive, and the IHDR colour type is inspected to check format selection.

use renderer::png::{encode_auto, encode_indexed, encode_rgba};
use test_utils::generators::{create_radar_raster, create_solid_raster};

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Offset of the colour type byte: signature, chunk length, "IHDR", width,
/// height, bit depth.
const COLOR_TYPE_OFFSET: usize = 25;

fn decode_rgba(png: &[u8]) -> (u32, u32, Vec<u8>) {
    let img = image::load_from_memory_with_format(png, image::ImageFormat::Png)
        .expect("encoded PNG should decode")
        .to_rgba8();
    let (w, h) = img.dimensions();
    (w, h, img.into_raw())
}

/// Reflectivity-like raster: transparent no-data plus a few echo colours.
fn masked_radar_pixels(width: usize, height: usize) -> Vec<u8> {
    let echoes = [[4, 233, 231, 255], [1, 159, 244, 255], [3, 0, 244, 255], [2, 253, 2, 255]];
    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            if (x + y) % 3 == 0 {
                pixels.extend_from_slice(&[0, 0, 0, 0]);
            } else {
                pixels.extend_from_slice(&echoes[(x / 4 + y / 4) % echoes.len()]);
            }
        }
    }
    pixels
}

// ============================================================================
// Format selection tests
// ============================================================================

#[test]
fn test_auto_uses_palette_for_few_colors() {
    let pixels = masked_radar_pixels(64, 32);
    let png = encode_auto(&pixels, 64, 32).unwrap();

    assert_eq!(&png[0..8], &PNG_SIGNATURE);
    assert_eq!(png[COLOR_TYPE_OFFSET], 3);

    let (w, h, decoded) = decode_rgba(&png);
    assert_eq!((w, h), (64, 32));
    assert_eq!(decoded, pixels);
}

#[test]
fn test_auto_falls_back_to_rgba() {
    // 257 distinct colours
    let mut pixels = Vec::with_capacity(257 * 4);
    for i in 0..256 {
        let v = i as u8;
        pixels.extend_from_slice(&[v, v, v, 255]);
    }
    pixels.extend_from_slice(&[128, 0, 0, 255]);

    let png = encode_auto(&pixels, 257, 1).unwrap();
    assert_eq!(png[COLOR_TYPE_OFFSET], 6);

    let (_, _, decoded) = decode_rgba(&png);
    assert_eq!(decoded, pixels);
}

#[test]
fn test_exactly_256_colors_stays_indexed() {
    let mut pixels = Vec::with_capacity(256 * 4);
    for i in 0..256 {
        let v = i as u8;
        pixels.extend_from_slice(&[v, 0, 255 - v, 255]);
    }

    let png = encode_auto(&pixels, 16, 16).unwrap();
    assert_eq!(png[COLOR_TYPE_OFFSET], 3);
    assert_eq!(decode_rgba(&png).2, pixels);
}

#[test]
fn test_transparency_preserved_in_palette() {
    let pixels = create_radar_raster(30, 30)
        .chunks_exact(4)
        .flat_map(|p| if p[..3] == [0, 0, 0] { [0, 0, 0, 0] } else { [p[0], p[1], p[2], 255] })
        .collect::<Vec<u8>>();

    let png = encode_auto(&pixels, 30, 30).unwrap();
    let (_, _, decoded) = decode_rgba(&png);
    assert_eq!(decoded[3], 0);
    assert_eq!(decoded, pixels);
}

#[test]
fn test_indexed_smaller_than_rgba_for_radar() {
    let pixels = masked_radar_pixels(256, 256);

    let indexed = encode_auto(&pixels, 256, 256).unwrap();
    let rgba = encode_rgba(&pixels, 256, 256).unwrap();

    assert!(
        indexed.len() < rgba.len(),
        "Indexed PNG ({} bytes) should be smaller than RGBA ({} bytes)",
        indexed.len(),
        rgba.len()
    );
}

// ============================================================================
// Edge case tests
// ============================================================================

#[test]
fn test_single_color_map_is_small() {
    let pixels = create_solid_raster(100, 100, [0, 17, 119, 255]);
    let png = encode_auto(&pixels, 100, 100).unwrap();
    assert!(png.len() < 1000, "Single colour 100x100 should be very small");
}

#[test]
fn test_wrong_buffer_length_rejected() {
    assert!(encode_auto(&[0u8; 15], 2, 2).is_err());
    assert!(encode_rgba(&[0u8; 17], 2, 2).is_err());
}

#[test]
fn test_indexed_validates_inputs() {
    let palette = [[255, 0, 0, 255]];
    assert!(encode_indexed(2, 2, &palette, &[0, 0, 0]).is_err());
    assert!(encode_indexed(1, 1, &[], &[0]).is_err());
    assert!(encode_indexed(2, 1, &palette, &[0, 0]).is_ok());
}
