//! Country boundaries for the choropleth.
//!
//! Reads GeoJSON `FeatureCollection`s whose features carry `ISO_A3` and
//! `ADMIN` properties and `Polygon` / `MultiPolygon` geometry.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value as JsonValue;

use crate::data::catalog::format_value;
use crate::error::DataError;

/// Tooltip text for countries without an aggregate.
pub const MISSING_DATA: &str = "missing data";

/// One polygon: outer ring first, then holes. Points are `[lon, lat]`.
pub type Polygon = Vec<Vec<[f64; 2]>>;

pub type Triangle = [[f64; 2]; 3];

#[derive(Debug, Clone, PartialEq)]
pub struct CountryShape {
    pub iso3: String,
    pub name: String,
    pub polygons: Vec<Polygon>,
    /// Outer rings split into triangles for filling. Holes are not cut out.
    pub fill: Vec<Triangle>,
}

impl CountryShape {
    /// Even-odd test over every ring, so holes are excluded.
    pub fn contains(&self, point: [f64; 2]) -> bool {
        self.polygons.iter().any(|polygon| {
            polygon
                .iter()
                .filter(|ring| ring_contains(ring, point))
                .count()
                % 2
                == 1
        })
    }
}

fn ring_contains(ring: &[[f64; 2]], [x, y]: [f64; 2]) -> bool {
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let [xi, yi] = ring[i];
        let [xj, yj] = ring[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

// ---------------------------------------------------------------------------
// Triangulation
// ---------------------------------------------------------------------------

/// Ear-clipping triangulation of a simple ring, open or closed, in either
/// winding. Self-intersecting rings still yield `n - 2` triangles, but some
/// of them may spill outside the ring.
pub fn triangulate(ring: &[[f64; 2]]) -> Vec<Triangle> {
    let mut pts = ring.to_vec();
    if pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }
    if pts.len() < 3 {
        return Vec::new();
    }
    if signed_area(&pts) < 0.0 {
        pts.reverse();
    }

    let mut idx: Vec<usize> = (0..pts.len()).collect();
    let mut out = Vec::with_capacity(pts.len() - 2);
    while idx.len() > 3 {
        let n = idx.len();
        let corner = |i: usize| {
            [
                pts[idx[(i + n - 1) % n]],
                pts[idx[i]],
                pts[idx[(i + 1) % n]],
            ]
        };
        let is_ear = |i: usize| {
            let [a, b, c] = corner(i);
            cross(a, b, c) > 0.0
                && idx
                    .iter()
                    .map(|&k| pts[k])
                    .filter(|p| *p != a && *p != b && *p != c)
                    .all(|p| !in_triangle(p, a, b, c))
        };
        // Degenerate rings may have no strict ear left.
        let ear = (0..n).find(|&i| is_ear(i)).unwrap_or(0);
        out.push(corner(ear));
        idx.remove(ear);
    }
    out.push([pts[idx[0]], pts[idx[1]], pts[idx[2]]]);
    out
}

fn signed_area(pts: &[[f64; 2]]) -> f64 {
    let n = pts.len();
    (0..n)
        .map(|i| {
            let [x0, y0] = pts[i];
            let [x1, y1] = pts[(i + 1) % n];
            x0 * y1 - x1 * y0
        })
        .sum::<f64>()
        / 2.0
}

/// Positive when `a -> b -> c` turns counter-clockwise.
fn cross(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

/// Closed test against a counter-clockwise triangle.
fn in_triangle(p: [f64; 2], a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> bool {
    cross(a, b, p) >= 0.0 && cross(b, c, p) >= 0.0 && cross(c, a, p) >= 0.0
}

// ---------------------------------------------------------------------------
// Boundary set
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Boundaries {
    pub shapes: Vec<CountryShape>,
}

impl Boundaries {
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Shape under `point`, if any.
    pub fn shape_at(&self, point: [f64; 2]) -> Option<&CountryShape> {
        self.shapes.iter().find(|s| s.contains(point))
    }
}

/// Hover text for a country: its name, then the estimate or
/// [`MISSING_DATA`].
pub fn tooltip(shape: &CountryShape, values: &BTreeMap<String, f64>, indicator: &str) -> String {
    match values.get(&shape.iso3) {
        Some(v) => format!("{}\nEstimate:{}", shape.name, format_value(indicator, *v)),
        None => format!("{}\n{MISSING_DATA}", shape.name),
    }
}

// ---------------------------------------------------------------------------
// GeoJSON parsing
// ---------------------------------------------------------------------------

pub fn load_geojson(path: &Path) -> Result<Boundaries> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    parse_geojson(&text).with_context(|| format!("parsing {}", path.display()))
}

pub fn parse_geojson(text: &str) -> Result<Boundaries> {
    let root: JsonValue = serde_json::from_str(text).context("parsing GeoJSON")?;
    let features = root
        .get("features")
        .and_then(JsonValue::as_array)
        .context("expected a FeatureCollection with a 'features' array")?;

    let mut shapes = Vec::with_capacity(features.len());
    for (index, feature) in features.iter().enumerate() {
        let props = feature.get("properties");
        let prop = |key: &str| {
            props
                .and_then(|p| p.get(key))
                .and_then(JsonValue::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let Some(geometry) = feature.get("geometry").filter(|g| !g.is_null()) else {
            log::debug!("feature {index} ({}) has no geometry", prop("ADMIN"));
            continue;
        };
        let polygons = parse_geometry(geometry, index)?;
        let fill = polygons
            .iter()
            .filter_map(|p| p.first())
            .flat_map(|outer| triangulate(outer))
            .collect();
        shapes.push(CountryShape {
            iso3: prop("ISO_A3"),
            name: prop("ADMIN"),
            polygons,
            fill,
        });
    }
    Ok(Boundaries { shapes })
}

fn parse_geometry(geometry: &JsonValue, index: usize) -> Result<Vec<Polygon>> {
    let invalid = |reason: &str| DataError::InvalidGeometry {
        index,
        reason: reason.to_string(),
    };
    let kind = geometry
        .get("type")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| invalid("missing geometry type"))?;
    let coords = geometry
        .get("coordinates")
        .ok_or_else(|| invalid("missing coordinates"))?;

    match kind {
        "Polygon" => Ok(vec![parse_polygon(coords).ok_or_else(|| invalid("bad Polygon"))?]),
        "MultiPolygon" => coords
            .as_array()
            .ok_or_else(|| invalid("bad MultiPolygon"))?
            .iter()
            .map(|p| {
                parse_polygon(p)
                    .ok_or_else(|| anyhow::Error::from(invalid("bad MultiPolygon member")))
            })
            .collect(),
        other => Err(invalid(&format!("unsupported geometry type {other}")).into()),
    }
}

fn parse_polygon(value: &JsonValue) -> Option<Polygon> {
    value
        .as_array()?
        .iter()
        .map(|ring| -> Option<Vec<[f64; 2]>> {
            ring.as_array()?
                .iter()
                .map(|pt| -> Option<[f64; 2]> {
                    let pt = pt.as_array()?;
                    Some([pt.first()?.as_f64()?, pt.get(1)?.as_f64()?])
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"ADMIN": "Squareland", "ISO_A3": "SQL"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [
                        [[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]],
                        [[4, 4], [6, 4], [6, 6], [4, 6], [4, 4]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": {"ADMIN": "Islands", "ISO_A3": "ISL"},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[20, 0], [22, 0], [22, 2], [20, 0]]],
                        [[[30, 0], [32, 0], [32, 2], [30, 0]]]
                    ]
                }
            },
            {"type": "Feature", "properties": {"ADMIN": "Nowhere"}, "geometry": null}
        ]
    }"#;

    #[test]
    fn parses_polygons_and_multipolygons() {
        let b = parse_geojson(SAMPLE).unwrap();
        assert_eq!(b.len(), 2);
        assert_eq!(b.shapes[0].iso3, "SQL");
        assert_eq!(b.shapes[0].polygons[0].len(), 2);
        assert_eq!(b.shapes[1].polygons.len(), 2);
    }

    #[test]
    fn hit_test_respects_holes() {
        let b = parse_geojson(SAMPLE).unwrap();
        assert_eq!(b.shape_at([1.0, 1.0]).map(|s| s.name.as_str()), Some("Squareland"));
        assert!(b.shape_at([5.0, 5.0]).is_none());
        assert_eq!(b.shape_at([31.5, 0.5]).map(|s| s.iso3.as_str()), Some("ISL"));
        assert!(b.shape_at([50.0, 50.0]).is_none());
    }

    #[test]
    fn tooltip_reports_missing_data() {
        let b = parse_geojson(SAMPLE).unwrap();
        let values = BTreeMap::from([("SQL".to_string(), 0.456)]);
        assert_eq!(tooltip(&b.shapes[0], &values, "Rate"), "Squareland\nEstimate:0.46");
        assert_eq!(tooltip(&b.shapes[1], &values, "Rate"), "Islands\nmissing data");
    }

    fn area(tris: &[Triangle]) -> f64 {
        tris.iter().map(|t| signed_area(t).abs()).sum()
    }

    #[test]
    fn square_splits_into_two_triangles() {
        let ring = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]];
        let tris = triangulate(&ring);
        assert_eq!(tris.len(), 2);
        assert_eq!(area(&tris), 100.0);
    }

    #[test]
    fn concave_ring_fill_stays_inside() {
        // L shape, clockwise, with the notch at the top right.
        let ring = [
            [0.0, 0.0],
            [0.0, 4.0],
            [2.0, 4.0],
            [2.0, 2.0],
            [4.0, 2.0],
            [4.0, 0.0],
        ];
        let tris = triangulate(&ring);
        assert_eq!(tris.len(), 4);
        assert_eq!(area(&tris), 12.0);

        let covers = |p: [f64; 2]| {
            tris.iter().any(|t| {
                let [a, b, c] = if signed_area(t) < 0.0 { [t[0], t[2], t[1]] } else { *t };
                in_triangle(p, a, b, c)
            })
        };
        assert!(covers([1.0, 3.0]));
        assert!(covers([3.0, 1.0]));
        assert!(!covers([3.0, 3.0]));
    }

    #[test]
    fn parsed_shapes_carry_their_fill() {
        let b = parse_geojson(SAMPLE).unwrap();
        assert_eq!(area(&b.shapes[0].fill), 100.0);
        assert_eq!(b.shapes[1].fill.len(), 2);
        assert!(triangulate(&[[0.0, 0.0], [1.0, 1.0]]).is_empty());
    }

    #[test]
    fn unsupported_geometry_is_an_error() {
        let text = r#"{"features": [{"properties": {}, "geometry": {"type": "Point", "coordinates": [1, 2]}}]}"#;
        let err = parse_geojson(text).unwrap_err();
        assert!(format!("{err:#}").contains("unsupported geometry type Point"));
    }
}
