//! Geographic point and closed-ring polygon types.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{BoundingBox, MesoError, MesoResult};

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point, rejecting coordinates outside [-90, 90] / [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> MesoResult<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(MesoError::MalformedDiscussion(format!(
                "latitude {} out of range [-90, 90]",
                latitude
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(MesoError::MalformedDiscussion(format!(
                "longitude {} out of range [-180, 180]",
                longitude
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// A closed polygon ring.
///
/// Invariants: at least three distinct vertices, and the first vertex is
/// repeated as the last one. Vertex order is kept exactly as supplied;
/// self-intersection is not checked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polygon {
    vertices: Vec<GeoPoint>,
}

impl Polygon {
    /// Build a polygon from an already-closed ring of vertices.
    pub fn new(vertices: Vec<GeoPoint>) -> MesoResult<Self> {
        let (first, last) = match (vertices.first(), vertices.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(MesoError::MalformedDiscussion(
                    "polygon has no vertices".to_string(),
                ))
            }
        };

        if first != last {
            return Err(MesoError::MalformedDiscussion(format!(
                "polygon ring is not closed: first {:?} != last {:?}",
                first, last
            )));
        }

        let distinct = distinct_count(&vertices);
        if distinct < 3 {
            return Err(MesoError::MalformedDiscussion(format!(
                "polygon needs at least 3 distinct vertices, found {}",
                distinct
            )));
        }

        Ok(Self { vertices })
    }

    /// Vertices in ring order, including the closing vertex.
    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    /// Number of vertices including the closing vertex.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Smallest bounding box containing every vertex.
    pub fn bounds(&self) -> BoundingBox {
        let mut bbox = BoundingBox::new(f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for p in &self.vertices {
            bbox.min_x = bbox.min_x.min(p.longitude);
            bbox.max_x = bbox.max_x.max(p.longitude);
            bbox.min_y = bbox.min_y.min(p.latitude);
            bbox.max_y = bbox.max_y.max(p.latitude);
        }
        bbox
    }

    /// GeoJSON Feature with a Polygon geometry (`[lon, lat]` positions).
    pub fn to_geojson(&self, properties: Value) -> Value {
        let ring: Vec<[f64; 2]> = self
            .vertices
            .iter()
            .map(|p| [p.longitude, p.latitude])
            .collect();

        json!({
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [ring],
            },
            "properties": properties,
        })
    }
}

fn distinct_count(points: &[GeoPoint]) -> usize {
    let mut seen: Vec<&GeoPoint> = Vec::with_capacity(points.len());
    for p in points {
        if !seen.contains(&p) {
            seen.push(p);
        }
    }
    seen.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn test_point_range_validation() {
        assert!(GeoPoint::new(90.0, -180.0).is_ok());
        assert!(GeoPoint::new(90.01, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -180.5).is_err());
    }

    #[test]
    fn test_polygon_requires_closed_ring() {
        let open = vec![pt(40.0, -75.0), pt(41.0, -75.0), pt(41.0, -76.0)];
        assert!(matches!(
            Polygon::new(open),
            Err(MesoError::MalformedDiscussion(_))
        ));
    }

    #[test]
    fn test_polygon_requires_three_distinct() {
        let degenerate = vec![pt(40.0, -75.0), pt(41.0, -75.0), pt(40.0, -75.0)];
        assert!(Polygon::new(degenerate).is_err());
    }

    #[test]
    fn test_geojson_uses_lon_lat_order() {
        let polygon = Polygon::new(vec![
            pt(40.0, -75.0),
            pt(41.0, -75.0),
            pt(41.0, -76.0),
            pt(40.0, -75.0),
        ])
        .unwrap();

        let feature = polygon.to_geojson(json!({}));
        assert_eq!(feature["geometry"]["type"], "Polygon");
        assert_eq!(feature["geometry"]["coordinates"][0][0][0], -75.0);
        assert_eq!(feature["geometry"]["coordinates"][0][0][1], 40.0);
        assert_eq!(
            feature["geometry"]["coordinates"][0]
                .as_array()
                .map(Vec::len),
            Some(4)
        );
    }
}
