//! Geometry on the unit sphere.
//!
//! Rings are sequences of unit vectors joined by great-circle (minor arc)
//! edges. A trailing vertex equal to the first one is allowed and harmless.

use std::f64::consts::{PI, TAU};

use super::Vec3;

/// Longitude/latitude in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LonLat {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl LonLat {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    pub fn to_unit(self) -> Vec3 {
        let lon = self.lon_deg.to_radians();
        let lat = self.lat_deg.to_radians();
        let cos_lat = lat.cos();
        Vec3::new(cos_lat * lon.cos(), cos_lat * lon.sin(), lat.sin())
    }

    /// Inverse of [`LonLat::to_unit`]; the input need not be normalized.
    pub fn from_unit(v: Vec3) -> Self {
        let horizontal = (v.x * v.x + v.y * v.y).sqrt();
        Self::new(
            v.y.atan2(v.x).to_degrees(),
            v.z.atan2(horizontal).to_degrees(),
        )
    }
}

/// Great-circle distance between two unit vectors, in radians.
pub fn angular_distance(a: Vec3, b: Vec3) -> f64 {
    a.cross(b).length().atan2(a.dot(b))
}

/// Number of times `ring` winds around `point`, as seen in the tangent plane
/// at `point`.
///
/// Each edge contributes the signed angle it subtends at `point`. The sum is
/// a multiple of 2π whenever neither `point` nor its antipode lies on the
/// ring. A non-zero result means the ring separates `point` from its
/// antipode; it does not say which of the two is enclosed.
pub fn ring_winding(point: Vec3, ring: &[Vec3]) -> i32 {
    if ring.len() < 3 {
        return 0;
    }

    let mut sum = 0.0;
    for (i, &a) in ring.iter().enumerate() {
        let b = ring[(i + 1) % ring.len()];
        let sin = point.dot(a.cross(b));
        let cos = a.dot(b) - point.dot(a) * point.dot(b);
        sum += sin.atan2(cos);
    }

    (sum / TAU).round() as i32
}

/// Whether `point` lies on the enclosed side of `ring`.
///
/// The enclosed side is the one facing the ring's vertex mean, so rings
/// larger than a hemisphere are not supported.
pub fn ring_contains(point: Vec3, ring: &[Vec3]) -> bool {
    if ring_winding(point, ring) == 0 {
        return false;
    }
    match vertex_mean(ring) {
        Some(mean) => point.dot(mean) > 0.0,
        None => true,
    }
}

/// Normalized sum of the vertices, `None` when they cancel out.
pub fn vertex_mean(ring: &[Vec3]) -> Option<Vec3> {
    ring.iter()
        .fold(Vec3::new(0.0, 0.0, 0.0), |acc, &p| acc + p)
        .normalize()
}

/// Even-odd containment over a polygon's rings (outer ring plus holes).
///
/// Ring orientation is ignored, so producers with either winding convention
/// give the same answer.
pub fn polygon_contains<R: AsRef<[Vec3]>>(point: Vec3, rings: &[R]) -> bool {
    let crossings = rings
        .iter()
        .filter(|ring| ring_contains(point, ring.as_ref()))
        .count();
    crossings % 2 == 1
}

/// Smallest-effort bounding cap: centred on the normalized vertex mean, with
/// a radius reaching the farthest vertex.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SphericalCap {
    pub center: Vec3,
    pub radius_rad: f64,
}

impl SphericalCap {
    /// The whole sphere. Used when no tighter cap is meaningful.
    pub fn everything() -> Self {
        Self {
            center: Vec3::new(1.0, 0.0, 0.0),
            radius_rad: PI,
        }
    }

    pub fn around<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Vec3> + Clone,
    {
        let mut sum = Vec3::new(0.0, 0.0, 0.0);
        let mut any = None;
        for &p in points.clone() {
            sum = sum + p;
            any.get_or_insert(p);
        }

        let Some(first) = any else {
            return Self::everything();
        };
        let center = sum.normalize().unwrap_or(first);

        let radius_rad = points
            .into_iter()
            .map(|&p| angular_distance(center, p))
            .fold(0.0, f64::max);

        // Past a quarter turn the cap no longer bounds the enclosed side of
        // the ring reliably.
        if radius_rad >= PI * 0.5 {
            return Self::everything();
        }

        Self { center, radius_rad }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        self.radius_rad >= PI || angular_distance(self.center, point) <= self.radius_rad + 1e-9
    }
}
