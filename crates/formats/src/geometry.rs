use foundation::math::LonLat;
use serde_json::{Map, Value};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    pub fn lon_lat(self) -> LonLat {
        LonLat::new(self.lon_deg, self.lat_deg)
    }
}

/// A closed sequence of positions; the last point normally repeats the first.
pub type Ring = Vec<GeoPoint>;

/// Outer ring followed by any holes.
pub type Polygon = Vec<Ring>;

#[derive(Debug, Clone, PartialEq)]
pub enum VectorGeometry {
    Point(GeoPoint),
    MultiPoint(Vec<GeoPoint>),
    LineString(Vec<GeoPoint>),
    MultiLineString(Vec<Vec<GeoPoint>>),
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
}

impl VectorGeometry {
    pub fn type_name(&self) -> &'static str {
        match self {
            VectorGeometry::Point(_) => "Point",
            VectorGeometry::MultiPoint(_) => "MultiPoint",
            VectorGeometry::LineString(_) => "LineString",
            VectorGeometry::MultiLineString(_) => "MultiLineString",
            VectorGeometry::Polygon(_) => "Polygon",
            VectorGeometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// Polygons of an areal geometry; empty for points and lines.
    pub fn polygons(&self) -> Vec<&Polygon> {
        match self {
            VectorGeometry::Polygon(p) => vec![p],
            VectorGeometry::MultiPolygon(ps) => ps.iter().collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_areal(&self) -> bool {
        matches!(
            self,
            VectorGeometry::Polygon(_) | VectorGeometry::MultiPolygon(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorFeature {
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    /// `None` for null geometries, which TopoJSON allows.
    pub geometry: Option<VectorGeometry>,
}

impl VectorFeature {
    pub fn name(&self) -> Option<&str> {
        self.properties.get("name").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<VectorFeature>,
}

impl FeatureCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn areal_count(&self) -> usize {
        self.features
            .iter()
            .filter(|f| f.geometry.as_ref().is_some_and(VectorGeometry::is_areal))
            .count()
    }
}

/// Feature ids arrive as strings or numbers; both are kept as text.
pub(crate) fn id_from_value(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}
