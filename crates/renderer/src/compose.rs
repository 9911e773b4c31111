//! Map composition: basemap fill, radar overlay and discussion polygon.
//!
//! Everything the renderer needs arrives in a [`RenderContext`]; nothing is
//! kept between calls.

use meso_common::{BoundingBox, MesoError, MesoResult, Polygon};
use radar::AlphaMaskedImage;
use rayon::prelude::*;
use tiny_skia::{FillRule, IntSize, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};
use tracing::{debug, info};

use crate::png;
use crate::style::MapStyle;

/// Masked radar raster and the geographic extent it covers.
#[derive(Debug, Clone)]
pub struct RadarOverlay {
    pub image: AlphaMaskedImage,
    pub extent: BoundingBox,
}

/// Inputs for one map.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub polygon: Polygon,
    pub radar: Option<RadarOverlay>,
    pub validity_label: String,
}

/// Geographic window and output size of the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub bounds: BoundingBox,
    pub width: u32,
    pub height: u32,
}

impl Default for MapView {
    /// Northeastern US, 1000x1000.
    fn default() -> Self {
        Self {
            bounds: BoundingBox::new(-80.3, 40.3, -71.8, 45.4),
            width: 1000,
            height: 1000,
        }
    }
}

impl MapView {
    /// Pixel position of a lon/lat pair. Not clamped.
    pub fn project(&self, lon: f64, lat: f64) -> (f32, f32) {
        let x = (lon - self.bounds.min_x) / self.bounds.width() * f64::from(self.width);
        let y = (self.bounds.max_y - lat) / self.bounds.height() * f64::from(self.height);
        (x as f32, y as f32)
    }

    /// Lon/lat at the centre of pixel (col, row).
    fn unproject(&self, col: u32, row: u32) -> (f64, f64) {
        let lon = self.bounds.min_x
            + (f64::from(col) + 0.5) / f64::from(self.width) * self.bounds.width();
        let lat = self.bounds.max_y
            - (f64::from(row) + 0.5) / f64::from(self.height) * self.bounds.height();
        (lon, lat)
    }
}

/// A rendered RGBA8 map.
#[derive(Debug, Clone)]
pub struct RenderedMap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    pub validity_label: String,
}

impl RenderedMap {
    pub fn to_png(&self) -> MesoResult<Vec<u8>> {
        png::encode_auto(&self.pixels, self.width as usize, self.height as usize)
    }
}

/// Draw the map described by `ctx`.
pub fn render_map(ctx: RenderContext, style: &MapStyle, view: &MapView) -> MesoResult<RenderedMap> {
    style.validate()?;
    let size = IntSize::from_wh(view.width, view.height).ok_or_else(|| {
        MesoError::RenderError(format!("invalid map size {}x{}", view.width, view.height))
    })?;
    if view.bounds.width() <= 0.0 || view.bounds.height() <= 0.0 {
        return Err(MesoError::RenderError(format!(
            "map view has empty bounds {:?}",
            view.bounds.extent()
        )));
    }

    let background = style.background_rgb()?;
    let mut pixels = vec![0u8; view.width as usize * view.height as usize * 4];
    for px in pixels.chunks_exact_mut(4) {
        px.copy_from_slice(&[background.0, background.1, background.2, 255]);
    }

    if let Some(radar) = &ctx.radar {
        draw_radar(&mut pixels, radar, view, style.radar_opacity);
    }

    let mut pixmap = Pixmap::from_vec(pixels, size)
        .ok_or_else(|| MesoError::RenderError("canvas allocation failed".to_string()))?;
    draw_polygon(&mut pixmap, &ctx.polygon, view, style)?;

    info!(
        width = view.width,
        height = view.height,
        vertices = ctx.polygon.vertex_count(),
        radar = ctx.radar.is_some(),
        label = %ctx.validity_label,
        "Rendered map"
    );

    // Every pixel is opaque, so premultiplied and straight alpha agree.
    Ok(RenderedMap {
        width: view.width,
        height: view.height,
        pixels: pixmap.take(),
        validity_label: ctx.validity_label,
    })
}

/// Nearest-neighbour sample the overlay into `canvas`, one row per task.
fn draw_radar(canvas: &mut [u8], radar: &RadarOverlay, view: &MapView, opacity: f32) {
    let extent = &radar.extent;
    let src_w = radar.image.width();
    let src_h = radar.image.height();
    let visible = match extent.intersection(&view.bounds) {
        Some(visible) if src_w > 0 && src_h > 0 => visible,
        _ => {
            debug!("Radar overlay is empty or outside the map view");
            return;
        }
    };
    let row_bytes = view.width as usize * 4;

    canvas
        .par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(row, out)| {
            let (_, row_lat) = view.unproject(0, row as u32);
            if row_lat < visible.min_y || row_lat > visible.max_y {
                return;
            }

            for col in 0..view.width {
                let (lon, lat) = view.unproject(col, row as u32);
                if !visible.contains_point(lon, lat) {
                    continue;
                }

                let sx = ((lon - extent.min_x) / extent.width() * f64::from(src_w)) as u32;
                let sy = ((extent.max_y - lat) / extent.height() * f64::from(src_h)) as u32;
                let Some(src) = radar.image.pixel(sx.min(src_w - 1), sy.min(src_h - 1)) else {
                    continue;
                };
                if src[3] == 0 {
                    continue;
                }

                let a = opacity * f32::from(src[3]) / 255.0;
                let i = col as usize * 4;
                for c in 0..3 {
                    let blended = f32::from(src[c]) * a + f32::from(out[i + c]) * (1.0 - a);
                    out[i + c] = blended.round().clamp(0.0, 255.0) as u8;
                }
            }
        });
}

fn draw_polygon(
    pixmap: &mut Pixmap,
    polygon: &Polygon,
    view: &MapView,
    style: &MapStyle,
) -> MesoResult<()> {
    let mut pb = PathBuilder::new();
    for (i, vertex) in polygon.vertices().iter().enumerate() {
        let (x, y) = view.project(vertex.longitude, vertex.latitude);
        if i == 0 {
            pb.move_to(x, y);
        } else {
            pb.line_to(x, y);
        }
    }
    pb.close();

    let path = pb
        .finish()
        .ok_or_else(|| MesoError::RenderError("polygon path is empty".to_string()))?;

    let (r, g, b) = style.fill_rgb()?;
    let mut fill = Paint::default();
    fill.set_color_rgba8(r, g, b, (style.polygon_fill_alpha * 255.0).round() as u8);
    fill.anti_alias = true;
    pixmap.fill_path(&path, &fill, FillRule::Winding, Transform::identity(), None);

    let (r, g, b) = style.outline_rgb()?;
    let mut outline = Paint::default();
    outline.set_color_rgba8(r, g, b, 255);
    outline.anti_alias = true;

    let mut stroke = Stroke::default();
    stroke.width = style.polygon_outline_width;
    stroke.line_cap = LineCap::Round;
    stroke.line_join = LineJoin::Round;
    pixmap.stroke_path(&path, &outline, &stroke, Transform::identity(), None);

    Ok(())
}
