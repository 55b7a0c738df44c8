//! GeoJSON `FeatureCollection` reader.

use serde_json::Value;

use crate::error::FormatError;
use crate::geometry::{
    FeatureCollection, GeoPoint, Polygon, VectorFeature, VectorGeometry, id_from_value,
};

impl FeatureCollection {
    pub fn from_geojson_str(payload: &str) -> Result<Self, FormatError> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_geojson_value(&value)
    }

    pub fn from_geojson_value(value: &Value) -> Result<Self, FormatError> {
        let obj = value.as_object().ok_or(FormatError::NotAFeatureCollection)?;
        if obj.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
            return Err(FormatError::NotAFeatureCollection);
        }
        let features_val = obj
            .get("features")
            .and_then(Value::as_array)
            .ok_or(FormatError::NotAFeatureCollection)?;

        let mut features = Vec::with_capacity(features_val.len());
        for (index, feat_val) in features_val.iter().enumerate() {
            let invalid = |reason: String| FormatError::InvalidFeature { index, reason };

            let feat_obj = feat_val
                .as_object()
                .ok_or_else(|| invalid("feature must be an object".to_string()))?;
            match feat_obj.get("type").and_then(Value::as_str) {
                Some("Feature") => {}
                Some(other) => return Err(invalid(format!("unexpected feature type: {other}"))),
                None => return Err(invalid("feature missing type".to_string())),
            }

            let properties = feat_obj
                .get("properties")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();

            let geometry = match feat_obj.get("geometry") {
                None | Some(Value::Null) => None,
                Some(g) => Some(parse_geometry(g).map_err(invalid)?),
            };

            features.push(VectorFeature {
                id: id_from_value(feat_obj.get("id")),
                properties,
                geometry,
            });
        }

        Ok(Self { features })
    }
}

fn parse_geometry(value: &Value) -> Result<VectorGeometry, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or("geometry missing type".to_string())?;
    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Point" => Ok(VectorGeometry::Point(parse_point(coords)?)),
        "MultiPoint" => Ok(VectorGeometry::MultiPoint(parse_points(coords)?)),
        "LineString" => Ok(VectorGeometry::LineString(parse_points(coords)?)),
        "MultiLineString" => Ok(VectorGeometry::MultiLineString(parse_polygon(coords)?)),
        "Polygon" => Ok(VectorGeometry::Polygon(parse_polygon(coords)?)),
        "MultiPolygon" => {
            let polys = coords
                .as_array()
                .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
            let polys = polys
                .iter()
                .map(parse_polygon)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(VectorGeometry::MultiPolygon(polys))
        }
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

fn parse_point(coords: &Value) -> Result<GeoPoint, String> {
    let arr = coords
        .as_array()
        .ok_or("position must be an array".to_string())?;
    match (
        arr.first().and_then(Value::as_f64),
        arr.get(1).and_then(Value::as_f64),
    ) {
        (Some(lon), Some(lat)) => Ok(GeoPoint::new(lon, lat)),
        _ => Err("position must have numeric [lon, lat]".to_string()),
    }
}

fn parse_points(coords: &Value) -> Result<Vec<GeoPoint>, String> {
    coords
        .as_array()
        .ok_or("coordinates must be an array".to_string())?
        .iter()
        .map(parse_point)
        .collect()
}

fn parse_polygon(coords: &Value) -> Result<Polygon, String> {
    coords
        .as_array()
        .ok_or("coordinates must be an array of rings".to_string())?
        .iter()
        .map(parse_points)
        .collect()
}
