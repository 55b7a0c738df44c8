//! TopoJSON decoding.
//!
//! A topology stores shared boundary arcs once; geometries reference them by
//! index. Arcs may be quantized, in which case positions are delta-encoded
//! integers mapped back to degrees by the topology `transform`.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::FormatError;
use crate::geometry::{
    FeatureCollection, GeoPoint, Polygon, Ring, VectorFeature, VectorGeometry, id_from_value,
};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

impl Transform {
    fn apply(&self, x: f64, y: f64) -> GeoPoint {
        GeoPoint::new(
            x * self.scale[0] + self.translate[0],
            y * self.scale[1] + self.translate[1],
        )
    }
}

/// Arc references; the nesting depth depends on the geometry type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum ArcRefs {
    Line(Vec<i64>),
    Lines(Vec<Vec<i64>>),
    Polygons(Vec<Vec<Vec<i64>>>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum Coordinates {
    Position(Vec<f64>),
    Positions(Vec<Vec<f64>>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TopoGeometry {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    arcs: Option<ArcRefs>,
    #[serde(default)]
    coordinates: Option<Coordinates>,
    #[serde(default)]
    geometries: Vec<TopoGeometry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Topology {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    transform: Option<Transform>,
    #[serde(default)]
    arcs: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    objects: BTreeMap<String, TopoGeometry>,
}

impl Topology {
    pub fn from_json_str(payload: &str) -> Result<Self, FormatError> {
        let topology: Topology = serde_json::from_str(payload)?;
        if topology.kind != "Topology" {
            return Err(FormatError::NotATopology(topology.kind));
        }
        Ok(topology)
    }

    pub fn from_json_value(value: Value) -> Result<Self, FormatError> {
        let topology: Topology = serde_json::from_value(value)?;
        if topology.kind != "Topology" {
            return Err(FormatError::NotATopology(topology.kind));
        }
        Ok(topology)
    }

    pub fn object_names(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn transform(&self) -> Option<Transform> {
        self.transform
    }

    /// Expand a named object into features.
    ///
    /// A `GeometryCollection` yields one feature per member (nested
    /// collections are flattened into a single feature each); any other
    /// geometry yields a single feature.
    pub fn feature(&self, object: &str) -> Result<FeatureCollection, FormatError> {
        let root = self
            .objects
            .get(object)
            .ok_or_else(|| FormatError::MissingObject(object.to_string()))?;

        let arcs = self.decode_arcs()?;
        let members: Vec<&TopoGeometry> = if root.kind.as_deref() == Some("GeometryCollection") {
            root.geometries.iter().collect()
        } else {
            vec![root]
        };

        let mut features = Vec::with_capacity(members.len());
        for geom in members {
            features.push(VectorFeature {
                id: id_from_value(geom.id.as_ref()),
                properties: geom.properties.clone().unwrap_or_default(),
                geometry: self.geometry(geom, &arcs)?,
            });
        }

        debug!(
            object,
            features = features.len(),
            arcs = arcs.len(),
            "decoded topology object"
        );
        Ok(FeatureCollection { features })
    }

    /// Absolute positions of every arc.
    fn decode_arcs(&self) -> Result<Vec<Vec<GeoPoint>>, FormatError> {
        self.arcs
            .iter()
            .map(|arc| {
                let mut x = 0.0;
                let mut y = 0.0;
                arc.iter()
                    .map(|pos| {
                        let (px, py) = position(pos)?;
                        Ok(match &self.transform {
                            Some(t) => {
                                x += px;
                                y += py;
                                t.apply(x, y)
                            }
                            None => GeoPoint::new(px, py),
                        })
                    })
                    .collect()
            })
            .collect()
    }

    fn point(&self, pos: &[f64]) -> Result<GeoPoint, FormatError> {
        let (x, y) = position(pos)?;
        Ok(match &self.transform {
            Some(t) => t.apply(x, y),
            None => GeoPoint::new(x, y),
        })
    }

    fn geometry(
        &self,
        geom: &TopoGeometry,
        arcs: &[Vec<GeoPoint>],
    ) -> Result<Option<VectorGeometry>, FormatError> {
        let Some(kind) = geom.kind.as_deref() else {
            return Ok(None);
        };
        let malformed = |field| FormatError::MalformedGeometry {
            kind: kind.to_string(),
            field,
        };

        let geometry = match (kind, &geom.arcs, &geom.coordinates) {
            ("Point", _, Some(Coordinates::Position(p))) => VectorGeometry::Point(self.point(p)?),
            ("MultiPoint", _, Some(Coordinates::Positions(ps))) => VectorGeometry::MultiPoint(
                ps.iter().map(|p| self.point(p)).collect::<Result<_, _>>()?,
            ),
            ("LineString", Some(ArcRefs::Line(refs)), _) => {
                VectorGeometry::LineString(join_arcs(refs, arcs)?)
            }
            ("MultiLineString" | "Polygon", Some(refs), _) => {
                let lines = as_lines(refs).ok_or_else(|| malformed("arcs"))?;
                let joined = lines
                    .iter()
                    .map(|line| join_arcs(line, arcs))
                    .collect::<Result<Vec<_>, _>>()?;
                if kind == "Polygon" {
                    VectorGeometry::Polygon(joined.into_iter().map(close_ring).collect())
                } else {
                    VectorGeometry::MultiLineString(joined)
                }
            }
            ("MultiPolygon", Some(refs), _) => {
                let polys = as_polygons(refs).ok_or_else(|| malformed("arcs"))?;
                let polys = polys
                    .iter()
                    .map(|rings| polygon(rings, arcs))
                    .collect::<Result<Vec<_>, _>>()?;
                VectorGeometry::MultiPolygon(polys)
            }
            ("Point" | "MultiPoint", _, _) => return Err(malformed("coordinates")),
            ("LineString" | "MultiLineString" | "Polygon" | "MultiPolygon", _, _) => {
                return Err(malformed("arcs"));
            }
            ("GeometryCollection", _, _) => {
                // Nested collections are merged into one areal geometry when
                // possible; anything else is dropped.
                let mut polys: Vec<Polygon> = Vec::new();
                for child in &geom.geometries {
                    match self.geometry(child, arcs)? {
                        Some(VectorGeometry::Polygon(p)) => polys.push(p),
                        Some(VectorGeometry::MultiPolygon(ps)) => polys.extend(ps),
                        _ => {}
                    }
                }
                if polys.is_empty() {
                    return Ok(None);
                }
                VectorGeometry::MultiPolygon(polys)
            }
            (other, _, _) => return Err(FormatError::UnsupportedGeometry(other.to_string())),
        };
        Ok(Some(geometry))
    }
}

fn position(pos: &[f64]) -> Result<(f64, f64), FormatError> {
    match pos {
        [x, y, ..] => Ok((*x, *y)),
        _ => Err(FormatError::InvalidPosition),
    }
}

/// Empty arc lists parse as the shallowest variant, so every depth accepts them.
fn as_lines(refs: &ArcRefs) -> Option<Vec<Vec<i64>>> {
    match refs {
        ArcRefs::Lines(lines) => Some(lines.clone()),
        ArcRefs::Line(l) if l.is_empty() => Some(Vec::new()),
        _ => None,
    }
}

fn as_polygons(refs: &ArcRefs) -> Option<Vec<Vec<Vec<i64>>>> {
    match refs {
        ArcRefs::Polygons(polys) => Some(polys.clone()),
        ArcRefs::Lines(polys) if polys.iter().all(Vec::is_empty) => {
            Some(polys.iter().map(|_| Vec::new()).collect())
        }
        ArcRefs::Line(l) if l.is_empty() => Some(Vec::new()),
        _ => None,
    }
}

fn polygon(rings: &[Vec<i64>], arcs: &[Vec<GeoPoint>]) -> Result<Polygon, FormatError> {
    rings
        .iter()
        .map(|ring| join_arcs(ring, arcs).map(close_ring))
        .collect()
}

/// Concatenate referenced arcs into one line. A negative reference `!i`
/// walks arc `i` backwards. Consecutive arcs share an endpoint, so each
/// arc after the first replaces the previous arc's last point.
fn join_arcs(refs: &[i64], arcs: &[Vec<GeoPoint>]) -> Result<Vec<GeoPoint>, FormatError> {
    let mut points: Vec<GeoPoint> = Vec::new();
    for &r in refs {
        let index = if r < 0 { !r } else { r };
        let arc = usize::try_from(index)
            .ok()
            .and_then(|i| arcs.get(i))
            .ok_or(FormatError::ArcOutOfRange {
                index: r,
                count: arcs.len(),
            })?;

        points.pop();
        if r < 0 {
            points.extend(arc.iter().rev().copied());
        } else {
            points.extend(arc.iter().copied());
        }
    }
    Ok(points)
}

/// Rings need at least four positions; degenerate ones repeat their start.
fn close_ring(mut ring: Ring) -> Ring {
    if let Some(&first) = ring.first() {
        while ring.len() < 4 {
            ring.push(first);
        }
    }
    ring
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Two unit squares sharing the edge x = 1, quantized with a 0.5°
    /// scale and a (-10, 20) offset.
    const TWO_SQUARES: &str = r#"{
        "type": "Topology",
        "transform": { "scale": [0.5, 0.5], "translate": [-10, 20] },
        "objects": {
            "countries": {
                "type": "GeometryCollection",
                "geometries": [
                    { "type": "Polygon", "id": "001", "properties": { "name": "West" }, "arcs": [[0, 1]] },
                    { "type": "Polygon", "id": 2, "properties": { "name": "East" }, "arcs": [[2, -1]] },
                    { "type": null, "id": "003" }
                ]
            },
            "land": {
                "type": "MultiPolygon",
                "arcs": [[[0, 1]], [[2, -1]]]
            }
        },
        "arcs": [
            [[2, 0], [0, 2]],
            [[2, 2], [-2, 0], [0, -2], [2, 0]],
            [[2, 0], [2, 0], [0, 2], [-2, 0]]
        ]
    }"#;

    fn pts(coords: &[(f64, f64)]) -> Vec<GeoPoint> {
        coords.iter().map(|&(x, y)| GeoPoint::new(x, y)).collect()
    }

    #[test]
    fn decodes_delta_quantized_arcs() {
        let topo = Topology::from_json_str(TWO_SQUARES).expect("parse");
        let arcs = topo.decode_arcs().expect("arcs");
        assert_eq!(arcs[0], pts(&[(-9.0, 20.0), (-9.0, 21.0)]));
        assert_eq!(
            arcs[1],
            pts(&[(-9.0, 21.0), (-10.0, 21.0), (-10.0, 20.0), (-9.0, 20.0)])
        );
    }

    #[test]
    fn collection_becomes_one_feature_per_member() {
        let topo = Topology::from_json_str(TWO_SQUARES).expect("parse");
        let fc = topo.feature("countries").expect("feature");
        assert_eq!(fc.len(), 3);
        assert_eq!(fc.areal_count(), 2);
        assert_eq!(fc.features[0].name(), Some("West"));
        assert_eq!(fc.features[1].id.as_deref(), Some("2"));
        assert!(fc.features[2].geometry.is_none());

        let Some(VectorGeometry::Polygon(west)) = &fc.features[0].geometry else {
            panic!("expected polygon");
        };
        assert_eq!(
            west[0],
            pts(&[
                (-9.0, 20.0),
                (-9.0, 21.0),
                (-10.0, 21.0),
                (-10.0, 20.0),
                (-9.0, 20.0),
            ])
        );
    }

    #[test]
    fn negative_refs_reverse_arcs() {
        let topo = Topology::from_json_str(TWO_SQUARES).expect("parse");
        let fc = topo.feature("countries").expect("feature");
        let Some(VectorGeometry::Polygon(east)) = &fc.features[1].geometry else {
            panic!("expected polygon");
        };
        assert_eq!(
            east[0],
            pts(&[
                (-9.0, 20.0),
                (-8.0, 20.0),
                (-8.0, 21.0),
                (-9.0, 21.0),
                (-9.0, 20.0),
            ])
        );
    }

    #[test]
    fn single_geometry_object_yields_one_feature() {
        let topo = Topology::from_json_str(TWO_SQUARES).expect("parse");
        let land = topo.feature("land").expect("feature");
        assert_eq!(land.len(), 1);
        let geom = land.features[0].geometry.as_ref().expect("geometry");
        assert_eq!(geom.polygons().len(), 2);
    }

    #[test]
    fn missing_object_and_bad_refs_are_errors() {
        let topo = Topology::from_json_str(TWO_SQUARES).expect("parse");
        assert!(matches!(
            topo.feature("rivers"),
            Err(FormatError::MissingObject(name)) if name == "rivers"
        ));

        let bad = r#"{"type":"Topology","arcs":[[[0,0],[1,1]]],
            "objects":{"x":{"type":"LineString","arcs":[0, 5]}}}"#;
        let topo = Topology::from_json_str(bad).expect("parse");
        assert!(matches!(
            topo.feature("x"),
            Err(FormatError::ArcOutOfRange { index: 5, count: 1 })
        ));
    }

    #[test]
    fn unquantized_topology_uses_raw_positions() {
        let raw = r#"{"type":"Topology","arcs":[[[0,0],[5,0],[5,5],[0,0]]],
            "objects":{"tri":{"type":"Polygon","arcs":[[0]]},
                       "pin":{"type":"Point","coordinates":[3.5,-1.25]}}}"#;
        let topo = Topology::from_json_str(raw).expect("parse");
        let tri = topo.feature("tri").expect("feature");
        let Some(VectorGeometry::Polygon(rings)) = &tri.features[0].geometry else {
            panic!("expected polygon");
        };
        assert_eq!(
            rings[0],
            pts(&[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0), (0.0, 0.0)])
        );

        let pin = topo.feature("pin").expect("feature");
        assert_eq!(
            pin.features[0].geometry,
            Some(VectorGeometry::Point(GeoPoint::new(3.5, -1.25)))
        );
    }

    #[test]
    fn short_rings_are_padded() {
        let ring = close_ring(pts(&[(1.0, 1.0), (2.0, 2.0)]));
        assert_eq!(ring.len(), 4);
        assert_eq!(ring[3], GeoPoint::new(1.0, 1.0));
    }

    #[test]
    fn rejects_other_document_types() {
        let err = Topology::from_json_str(r#"{"type":"FeatureCollection"}"#).unwrap_err();
        assert!(matches!(err, FormatError::NotATopology(kind) if kind == "FeatureCollection"));
    }
}
