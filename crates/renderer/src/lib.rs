//! Map rendering for mesoscale discussions.
//!
//! - Radar overlay placed by its geographic extent
//! - Discussion polygon fill and outline (tiny-skia)
//! - PNG encoding, indexed when the palette allows

pub mod compose;
pub mod png;
pub mod style;

pub use compose::{render_map, MapView, RadarOverlay, RenderContext, RenderedMap};
pub use style::MapStyle;
