use formats::{FeatureCollection, Polygon, VectorFeature};
use foundation::math::{LonLat, SphericalCap, Vec3, polygon_contains};
use tracing::debug;

/// Position of a shape in load order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u32);

impl ShapeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct SpherePolygon {
    rings: Vec<Vec<Vec3>>,
    bounds: SphericalCap,
}

/// A country (or landmass) ready for drawing and hit testing.
#[derive(Debug, Clone)]
pub struct Shape {
    id: ShapeId,
    feature_id: Option<String>,
    name: Option<String>,
    polygons: Vec<Polygon>,
    sphere: Vec<SpherePolygon>,
}

impl Shape {
    /// `None` for features without an areal geometry.
    pub fn from_feature(id: ShapeId, feature: &VectorFeature) -> Option<Self> {
        let geometry = feature.geometry.as_ref()?;
        let polygons: Vec<Polygon> = geometry
            .polygons()
            .into_iter()
            .filter(|p| !p.is_empty())
            .cloned()
            .collect();
        if polygons.is_empty() {
            return None;
        }

        let sphere = polygons
            .iter()
            .map(|polygon| {
                let rings: Vec<Vec<Vec3>> = polygon
                    .iter()
                    .map(|ring| ring.iter().map(|p| p.lon_lat().to_unit()).collect())
                    .collect();
                let bounds = SphericalCap::around(rings[0].iter());
                SpherePolygon { rings, bounds }
            })
            .collect();

        Some(Self {
            id,
            feature_id: feature.id.clone(),
            name: feature.name().map(str::to_string),
            polygons,
            sphere,
        })
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn feature_id(&self) -> Option<&str> {
        self.feature_id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Lon/lat polygons (outer ring then holes).
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn contains_unit(&self, point: Vec3) -> bool {
        self.sphere
            .iter()
            .any(|p| p.bounds.contains(point) && polygon_contains(point, &p.rings))
    }

    pub fn contains(&self, point: LonLat) -> bool {
        self.contains_unit(point.to_unit())
    }
}

/// Shapes in load order.
#[derive(Debug, Clone, Default)]
pub struct ShapeSet {
    shapes: Vec<Shape>,
}

impl ShapeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_features(collection: &FeatureCollection) -> Self {
        let mut shapes = Vec::with_capacity(collection.len());
        for feature in &collection.features {
            let id = ShapeId(shapes.len() as u32);
            if let Some(shape) = Shape::from_feature(id, feature) {
                shapes.push(shape);
            }
        }
        debug!(
            shapes = shapes.len(),
            skipped = collection.len() - shapes.len(),
            "built shape set"
        );
        Self { shapes }
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id.index())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Shape> {
        self.shapes.iter()
    }

    /// First shape, in load order, containing the point.
    pub fn find_containing(&self, point: Vec3) -> Option<ShapeId> {
        self.shapes
            .iter()
            .find(|s| s.contains_unit(point))
            .map(Shape::id)
    }
}

impl<'a> IntoIterator for &'a ShapeSet {
    type Item = &'a Shape;
    type IntoIter = std::slice::Iter<'a, Shape>;

    fn into_iter(self) -> Self::IntoIter {
        self.shapes.iter()
    }
}
