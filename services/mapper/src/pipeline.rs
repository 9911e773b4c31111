//! One mapping run: discussion in, map products out.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use discussion_parser::ValidityParser;
use meso_common::{MesoError, MesoResult, Polygon, ValidityWindow, VALIDITY_NOT_ACCESSIBLE};
use radar::{align, GeoTransform, RadarProduct, RawImage};
use renderer::{render_map, RadarOverlay, RenderContext, RenderedMap};
use serde::Serialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::config::MapperConfig;
use crate::fetch::Fetch;
use crate::source::SourceSelection;

/// Everything produced by a run.
#[derive(Debug)]
pub struct MapProducts {
    pub product: RadarProduct,
    pub polygon: Polygon,
    pub validity: Option<ValidityWindow>,
    pub validity_label: String,
    pub radar: RadarOverlay,
    pub map: RenderedMap,
}

/// Files written by [`write_outputs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub radar_png: PathBuf,
    pub polygon_geojson: PathBuf,
    pub map_png: PathBuf,
    pub summary_json: PathBuf,
}

#[derive(Debug, Serialize)]
struct Summary<'a> {
    product_time: DateTime<Utc>,
    image_url: String,
    world_file_url: String,
    /// `[min_x, max_x, min_y, max_y]`
    radar_extent: [f64; 4],
    opaque_pixels: usize,
    /// `[min_lon, max_lon, min_lat, max_lat]`
    polygon_bounds: [f64; 4],
    validity_start: Option<NaiveDateTime>,
    validity_end: Option<NaiveDateTime>,
    validity_label: &'a str,
    vertex_count: usize,
}

/// Run extraction, radar alignment and rendering for one discussion.
#[instrument(skip_all, fields(now = %now))]
pub async fn run(
    source: &SourceSelection,
    config: &MapperConfig,
    now: DateTime<Utc>,
    fetcher: &dyn Fetch,
) -> MesoResult<MapProducts> {
    let discussion = source.load(fetcher).await?;

    let polygon = discussion.polygon()?;
    info!(vertices = polygon.vertex_count(), "Extracted polygon");

    let view = config.view.to_map_view();
    if !polygon.bounds().intersects(&view.bounds) {
        warn!(bounds = ?polygon.bounds(), "Discussion area lies outside the map view");
    }

    // A linked page must yield its validity; only pasted text goes without.
    let (validity, validity_label) = match source {
        SourceSelection::DirectLink(_) => {
            let parser = ValidityParser::new(config.utc_offset_hours);
            let window = discussion.validity(&parser)?;
            let label = window.label();
            info!(start = %window.start, end = %window.end, "Resolved validity window");
            (Some(window), label)
        }
        SourceSelection::RawText(_) => {
            warn!("Pasted text has no product block, validity time unavailable");
            (None, VALIDITY_NOT_ACCESSIBLE.to_string())
        }
    };

    let product = RadarProduct::latest_at(now, &config.radar_base_url);
    info!(
        product_time = %product.display_time(),
        url = %product.image_url(),
        "Selected radar product"
    );

    let png = fetcher.fetch_bytes(&product.image_url()).await?;
    let world_file = fetcher.fetch_text(&product.world_file_url()).await?;

    let transform = GeoTransform::parse(&world_file)?;
    let raster = RawImage::decode_png(&png)?;
    let (image, extent) = align(&raster, &transform)?;
    let radar = RadarOverlay { image, extent };

    let ctx = RenderContext {
        polygon: polygon.clone(),
        radar: Some(radar.clone()),
        validity_label: validity_label.clone(),
    };
    let style = config.style.clone();
    let map = tokio::task::spawn_blocking(move || render_map(ctx, &style, &view))
        .await
        .map_err(|e| MesoError::RenderError(format!("render task failed: {}", e)))??;

    Ok(MapProducts {
        product,
        polygon,
        validity,
        validity_label,
        radar,
        map,
    })
}

/// Write the masked radar, polygon, map and summary into `dir`.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub async fn write_outputs(products: &MapProducts, dir: &Path) -> MesoResult<OutputPaths> {
    tokio::fs::create_dir_all(dir).await?;

    let timestamp = products.product.timestamp();
    let paths = OutputPaths {
        radar_png: dir.join(format!("n0q_{}_masked.png", timestamp)),
        polygon_geojson: dir.join("polygon.geojson"),
        map_png: dir.join("map.png"),
        summary_json: dir.join("summary.json"),
    };

    let radar = &products.radar.image;
    let radar_png =
        renderer::png::encode_auto(radar.pixels(), radar.width() as usize, radar.height() as usize)?;
    tokio::fs::write(&paths.radar_png, radar_png).await?;

    let feature = products.polygon.to_geojson(json!({
        "validity": products.validity_label,
        "radar_time": products.product.valid_time(),
    }));
    tokio::fs::write(&paths.polygon_geojson, serde_json::to_vec_pretty(&feature)?).await?;

    tokio::fs::write(&paths.map_png, products.map.to_png()?).await?;

    let summary = Summary {
        product_time: products.product.valid_time(),
        image_url: products.product.image_url(),
        world_file_url: products.product.world_file_url(),
        radar_extent: products.radar.extent.extent(),
        opaque_pixels: radar.opaque_count(),
        polygon_bounds: products.polygon.bounds().extent(),
        validity_start: products.validity.as_ref().map(|w| w.start),
        validity_end: products.validity.as_ref().map(|w| w.end),
        validity_label: &products.validity_label,
        vertex_count: products.polygon.vertex_count(),
    };
    tokio::fs::write(&paths.summary_json, serde_json::to_vec_pretty(&summary)?).await?;

    info!(
        map = %paths.map_png.display(),
        radar = %paths.radar_png.display(),
        "Wrote outputs"
    );
    Ok(paths)
}
