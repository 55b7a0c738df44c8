//! Boundary documents: TopoJSON topologies or GeoJSON feature collections.

use serde_json::Value;
use tracing::debug;

use crate::error::FormatError;
use crate::geometry::FeatureCollection;
use crate::topojson::Topology;

/// Object name used when a topology is loaded without one.
pub const DEFAULT_OBJECT: &str = "countries";

/// Parse a boundary document, detecting its kind from the top-level `type`.
///
/// `object` names the topology object to expand; it is ignored for GeoJSON.
pub fn load_boundaries(payload: &str, object: &str) -> Result<FeatureCollection, FormatError> {
    let value: Value = serde_json::from_str(payload)?;
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let collection = match kind.as_str() {
        "Topology" => Topology::from_json_value(value)?.feature(object)?,
        "FeatureCollection" => FeatureCollection::from_geojson_value(&value)?,
        _ => return Err(FormatError::UnknownDocument(kind)),
    };

    debug!(
        kind = %kind,
        features = collection.len(),
        areal = collection.areal_count(),
        "loaded boundaries"
    );
    Ok(collection)
}
