//! PNG encoding for rendered maps and masked radar rasters.
//!
//! Two encodings:
//! - **Indexed (color type 3)** when the image has at most 256 distinct RGBA
//!   values. Reflectivity composites and flat-colour maps usually qualify.
//! - **RGBA (color type 6)** otherwise.
//!
//! [`encode_auto`] picks between them.

use std::collections::{HashMap, HashSet};
use std::io::Write;

use meso_common::{MesoError, MesoResult};
use rayon::prelude::*;

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Maximum colors for indexed PNG
const MAX_PALETTE_SIZE: usize = 256;

/// Images at least this many pixels wide*high scan for colours in parallel.
const PARALLEL_THRESHOLD: usize = 64 * 64;

const COLOR_TYPE_INDEXED: u8 = 3;
const COLOR_TYPE_RGBA: u8 = 6;

/// Encode RGBA pixels, using a palette when the colours fit in one.
pub fn encode_auto(pixels: &[u8], width: usize, height: usize) -> MesoResult<Vec<u8>> {
    check_len(pixels, width, height)?;

    match extract_palette(pixels) {
        Some((palette, indices)) => encode_indexed(width, height, &palette, &indices),
        None => encode_rgba(pixels, width, height),
    }
}

/// Encode RGBA pixels as a truecolour-with-alpha PNG.
pub fn encode_rgba(pixels: &[u8], width: usize, height: usize) -> MesoResult<Vec<u8>> {
    check_len(pixels, width, height)?;

    let mut png = Vec::with_capacity(pixels.len() / 2);
    png.extend_from_slice(&PNG_SIGNATURE);
    write_chunk(&mut png, b"IHDR", &header(width, height, COLOR_TYPE_RGBA));
    write_chunk(&mut png, b"IDAT", &deflate_scanlines(pixels, width * 4, height)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Encode palette indices as an indexed PNG, with a tRNS chunk when any
/// palette entry is not fully opaque.
pub fn encode_indexed(
    width: usize,
    height: usize,
    palette: &[[u8; 4]],
    indices: &[u8],
) -> MesoResult<Vec<u8>> {
    if indices.len() != width * height {
        return Err(MesoError::RenderError(format!(
            "{}x{} indexed image needs {} indices, got {}",
            width,
            height,
            width * height,
            indices.len()
        )));
    }
    if palette.is_empty() || palette.len() > MAX_PALETTE_SIZE {
        return Err(MesoError::RenderError(format!(
            "palette must hold 1..={} colours, got {}",
            MAX_PALETTE_SIZE,
            palette.len()
        )));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);
    write_chunk(&mut png, b"IHDR", &header(width, height, COLOR_TYPE_INDEXED));

    let plte: Vec<u8> = palette.iter().flat_map(|c| [c[0], c[1], c[2]]).collect();
    write_chunk(&mut png, b"PLTE", &plte);

    if palette.iter().any(|c| c[3] < 255) {
        let trns: Vec<u8> = palette.iter().map(|c| c[3]).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    write_chunk(&mut png, b"IDAT", &deflate_scanlines(indices, width, height)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

fn check_len(pixels: &[u8], width: usize, height: usize) -> MesoResult<()> {
    if pixels.len() != width * height * 4 {
        return Err(MesoError::RenderError(format!(
            "{}x{} RGBA image needs {} bytes, got {}",
            width,
            height,
            width * height * 4,
            pixels.len()
        )));
    }
    Ok(())
}

fn header(width: usize, height: usize, color_type: u8) -> [u8; 13] {
    let mut ihdr = [0u8; 13];
    ihdr[0..4].copy_from_slice(&(width as u32).to_be_bytes());
    ihdr[4..8].copy_from_slice(&(height as u32).to_be_bytes());
    ihdr[8] = 8; // bit depth
    ihdr[9] = color_type;
    // compression, filter and interlace methods are all 0
    ihdr
}

#[inline(always)]
fn pack(px: &[u8]) -> u32 {
    u32::from_le_bytes([px[0], px[1], px[2], px[3]])
}

/// Palette and per-pixel indices, or `None` if there are too many colours.
///
/// Palette order is first appearance in the image.
fn extract_palette(pixels: &[u8]) -> Option<(Vec<[u8; 4]>, Vec<u8>)> {
    let pixel_count = pixels.len() / 4;

    if pixel_count >= PARALLEL_THRESHOLD {
        // Cheap rejection before the ordered pass: count distinct colours
        // per chunk in parallel and bail out as soon as any set overflows.
        let chunk_bytes = (pixel_count / rayon::current_num_threads()).max(256) * 4;
        let too_many = pixels
            .par_chunks(chunk_bytes)
            .map(|chunk| {
                let mut seen = HashSet::with_capacity(MAX_PALETTE_SIZE + 1);
                for px in chunk.chunks_exact(4) {
                    seen.insert(pack(px));
                    if seen.len() > MAX_PALETTE_SIZE {
                        return None;
                    }
                }
                Some(seen)
            })
            .try_reduce(HashSet::new, |mut a, b| {
                a.extend(b);
                if a.len() > MAX_PALETTE_SIZE {
                    None
                } else {
                    Some(a)
                }
            })
            .is_none();
        if too_many {
            return None;
        }
    }

    let mut lookup: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Vec<[u8; 4]> = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices = Vec::with_capacity(pixel_count);

    for px in pixels.chunks_exact(4) {
        let key = pack(px);
        let index = match lookup.get(&key) {
            Some(&i) => i,
            None => {
                if palette.len() == MAX_PALETTE_SIZE {
                    return None;
                }
                let i = palette.len() as u8;
                palette.push([px[0], px[1], px[2], px[3]]);
                lookup.insert(key, i);
                i
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

/// Prefix each row with filter type 0 and zlib-compress.
fn deflate_scanlines(data: &[u8], row_bytes: usize, height: usize) -> MesoResult<Vec<u8>> {
    let mut raw = Vec::with_capacity(height * (row_bytes + 1));
    for row in data.chunks_exact(row_bytes).take(height) {
        raw.push(0);
        raw.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder
        .write_all(&raw)
        .and_then(|_| encoder.finish())
        .map_err(|e| MesoError::RenderError(format!("IDAT compression failed: {}", e)))
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);

    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_palette_first_appearance_order() {
        let pixels = [
            255, 0, 0, 255, // red
            0, 255, 0, 255, // green
            0, 0, 0, 0, // transparent
            255, 0, 0, 255, // red again
        ];

        let (palette, indices) = extract_palette(&pixels).unwrap();
        assert_eq!(palette, vec![[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 0, 0]]);
        assert_eq!(indices, vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_extract_palette_too_many_colors() {
        let pixels: Vec<u8> = (0..300u32)
            .flat_map(|i| [(i % 256) as u8, (i / 256) as u8, 7, 255])
            .collect();
        assert!(extract_palette(&pixels).is_none());
    }

    #[test]
    fn test_extract_palette_large_image_parallel_path() {
        // 128x128 with 16 colours
        let pixels: Vec<u8> = (0..128 * 128)
            .flat_map(|i: usize| [((i / 8) % 16 * 16) as u8, 0, 0, 255])
            .collect();
        let (palette, indices) = extract_palette(&pixels).unwrap();
        assert_eq!(palette.len(), 16);
        assert_eq!(indices.len(), 128 * 128);
    }

    #[test]
    fn test_extract_palette_rejects_within_one_chunk() {
        // 65536 distinct colours, so a single chunk overflows before any merge
        let pixels: Vec<u8> = (0..256 * 256u32)
            .flat_map(|i| [(i % 256) as u8, (i / 256) as u8, 99, 255])
            .collect();
        assert!(extract_palette(&pixels).is_none());
    }

    #[test]
    fn test_extract_palette_rejects_across_chunks() {
        // Each 256-pixel run repeats a small colour set, but the runs differ
        let pixels: Vec<u8> = (0..256 * 256u32)
            .flat_map(|i| [((i / 256) % 256) as u8, (i % 2) as u8, 0, 255])
            .collect();
        assert!(extract_palette(&pixels).is_none());
    }

    #[test]
    fn test_header_layout() {
        let ihdr = header(300, 2, COLOR_TYPE_RGBA);
        assert_eq!(&ihdr[0..4], &300u32.to_be_bytes());
        assert_eq!(&ihdr[4..8], &2u32.to_be_bytes());
        assert_eq!(ihdr[8], 8);
        assert_eq!(ihdr[9], 6);
    }
}
