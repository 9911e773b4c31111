//! Mapper configuration.
//!
//! Layered lowest to highest: built-in defaults, an optional YAML file,
//! `MESO_*` environment variables, then command-line flags (applied in
//! `main`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use meso_common::{BoundingBox, DEFAULT_UTC_OFFSET_HOURS};
use radar::DEFAULT_ARCHIVE_BASE_URL;
use renderer::{MapStyle, MapView};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Root of the composite archive.
    pub radar_base_url: String,
    /// Per-request HTTP timeout.
    pub request_timeout_secs: u64,
    /// Fixed offset applied to validity times.
    pub utc_offset_hours: i32,
    pub output_dir: PathBuf,
    pub view: ViewConfig,
    pub style: MapStyle,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            radar_base_url: DEFAULT_ARCHIVE_BASE_URL.to_string(),
            request_timeout_secs: 60,
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            output_dir: PathBuf::from("output"),
            view: ViewConfig::default(),
            style: MapStyle::default(),
        }
    }
}

/// Map window in degrees and output size in pixels.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewConfig {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
    pub width: u32,
    pub height: u32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        let view = MapView::default();
        Self {
            min_lon: view.bounds.min_x,
            min_lat: view.bounds.min_y,
            max_lon: view.bounds.max_x,
            max_lat: view.bounds.max_y,
            width: view.width,
            height: view.height,
        }
    }
}

impl ViewConfig {
    pub fn set_bounds(&mut self, bounds: &BoundingBox) {
        self.min_lon = bounds.min_x;
        self.min_lat = bounds.min_y;
        self.max_lon = bounds.max_x;
        self.max_lat = bounds.max_y;
    }

    pub fn to_map_view(&self) -> MapView {
        MapView {
            bounds: BoundingBox::new(self.min_lon, self.min_lat, self.max_lon, self.max_lat),
            width: self.width,
            height: self.height,
        }
    }
}

impl MapperConfig {
    /// Load from a YAML file, or defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: MapperConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!(path = %path.display(), "Loaded mapper config");
        Ok(config)
    }

    /// Apply `MESO_*` overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`. Unparsable values are logged and ignored.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("MESO_RADAR_BASE_URL") {
            self.radar_base_url = val;
        }

        if let Some(val) = lookup("MESO_REQUEST_TIMEOUT_SECS") {
            match val.parse() {
                Ok(secs) => self.request_timeout_secs = secs,
                Err(e) => warn!(value = %val, error = %e, "Ignoring invalid MESO_REQUEST_TIMEOUT_SECS"),
            }
        }

        if let Some(val) = lookup("MESO_UTC_OFFSET_HOURS") {
            match val.parse() {
                Ok(hours) => self.utc_offset_hours = hours,
                Err(e) => warn!(value = %val, error = %e, "Ignoring invalid MESO_UTC_OFFSET_HOURS"),
            }
        }

        if let Some(val) = lookup("MESO_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(val);
        }

        if let Some(val) = lookup("MESO_VIEW_BBOX") {
            match BoundingBox::parse(&val) {
                Ok(bounds) => self.view.set_bounds(&bounds),
                Err(e) => warn!(value = %val, error = %e, "Ignoring invalid MESO_VIEW_BBOX"),
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.radar_base_url.trim().is_empty() {
            bail!("radar_base_url must not be empty");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be > 0");
        }
        if !(-12..=14).contains(&self.utc_offset_hours) {
            bail!(
                "utc_offset_hours must be between -12 and 14, got {}",
                self.utc_offset_hours
            );
        }
        if self.view.width == 0 || self.view.height == 0 {
            bail!("view width and height must be > 0");
        }
        if self.view.min_lon >= self.view.max_lon || self.view.min_lat >= self.view.max_lat {
            bail!("view bounds are empty or inverted");
        }
        self.style.validate().context("Invalid map style")?;
        Ok(())
    }
}
