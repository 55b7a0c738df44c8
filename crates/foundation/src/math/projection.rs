//! Orthographic projection of the unit sphere onto a screen.
//!
//! Rotation follows the d3-geo convention: `Rotation::new(λ, φ)` first adds
//! λ to every longitude, then tilts by φ about the y axis. The screen centre
//! shows `(-λ, -φ)`. Screen y grows downward.

use super::{LonLat, Vec2, Vec3};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rotation {
    pub lambda_deg: f64,
    pub phi_deg: f64,
}

impl Rotation {
    pub fn new(lambda_deg: f64, phi_deg: f64) -> Self {
        Self {
            lambda_deg,
            phi_deg,
        }
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Hemisphere-clipped orthographic projection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Orthographic {
    scale: f64,
    translate: Vec2,
    rotation: Rotation,
    // Cached trig of the rotation angles.
    cos_lambda: f64,
    sin_lambda: f64,
    cos_phi: f64,
    sin_phi: f64,
}

impl Orthographic {
    /// `scale` is the globe radius in pixels; `translate` the pixel position
    /// of the globe centre.
    pub fn new(scale: f64, translate: Vec2) -> Self {
        Self {
            scale,
            translate,
            rotation: Rotation::default(),
            cos_lambda: 1.0,
            sin_lambda: 0.0,
            cos_phi: 1.0,
            sin_phi: 0.0,
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        let lambda = rotation.lambda_deg.to_radians();
        let phi = rotation.phi_deg.to_radians();
        self.rotation = rotation;
        self.cos_lambda = lambda.cos();
        self.sin_lambda = lambda.sin();
        self.cos_phi = phi.cos();
        self.sin_phi = phi.sin();
        self
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn translate(&self) -> Vec2 {
        self.translate
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Rotate a unit vector from geographic into view space, where +x points
    /// at the viewer.
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        // Longitude shift about the polar axis.
        let x = v.x * self.cos_lambda - v.y * self.sin_lambda;
        let y = v.x * self.sin_lambda + v.y * self.cos_lambda;
        let z = v.z;

        // Tilt about y.
        Vec3::new(
            x * self.cos_phi - z * self.sin_phi,
            y,
            z * self.cos_phi + x * self.sin_phi,
        )
    }

    /// Inverse of [`Orthographic::rotate`].
    pub fn unrotate(&self, v: Vec3) -> Vec3 {
        let x = v.x * self.cos_phi + v.z * self.sin_phi;
        let z = v.z * self.cos_phi - v.x * self.sin_phi;
        Vec3::new(
            x * self.cos_lambda + v.y * self.sin_lambda,
            v.y * self.cos_lambda - x * self.sin_lambda,
            z,
        )
    }

    /// Whether a view-space unit vector is on the near hemisphere.
    pub fn is_visible_rotated(&self, rotated: Vec3) -> bool {
        rotated.x > 0.0
    }

    pub fn is_visible(&self, p: LonLat) -> bool {
        self.is_visible_rotated(self.rotate(p.to_unit()))
    }

    /// Screen position of a view-space vector, ignoring visibility.
    pub fn project_rotated(&self, rotated: Vec3) -> Vec2 {
        Vec2::new(
            self.translate.x + self.scale * rotated.y,
            self.translate.y - self.scale * rotated.z,
        )
    }

    /// Screen position of a geographic point, ignoring visibility.
    pub fn project(&self, p: LonLat) -> Vec2 {
        self.project_rotated(self.rotate(p.to_unit()))
    }

    /// Geographic point under a screen position.
    ///
    /// Positions outside the globe disc (or a degenerate scale) do not
    /// invert.
    pub fn invert(&self, screen: Vec2) -> Option<LonLat> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return None;
        }
        let y = (screen.x - self.translate.x) / self.scale;
        let z = (self.translate.y - screen.y) / self.scale;
        let rho2 = y * y + z * z;
        if !rho2.is_finite() || rho2 > 1.0 {
            return None;
        }
        let rotated = Vec3::new((1.0 - rho2).sqrt(), y, z);
        Some(LonLat::from_unit(self.unrotate(rotated)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn projection(lambda: f64, phi: f64) -> Orthographic {
        Orthographic::new(200.0, Vec2::new(400.0, 300.0))
            .with_rotation(Rotation::new(lambda, phi))
    }

    #[test]
    fn unrotated_origin_projects_to_center() {
        let p = projection(0.0, 0.0).project(LonLat::new(0.0, 0.0));
        assert_close(p.x, 400.0, 1e-9);
        assert_close(p.y, 300.0, 1e-9);
    }

    #[test]
    fn north_is_up_and_east_is_right() {
        let proj = projection(0.0, 0.0);
        let north = proj.project(LonLat::new(0.0, 90.0));
        assert_close(north.x, 400.0, 1e-9);
        assert_close(north.y, 100.0, 1e-9);
        let east = proj.project(LonLat::new(90.0, 0.0));
        assert_close(east.x, 600.0, 1e-9);
        assert_close(east.y, 300.0, 1e-9);
    }

    #[test]
    fn rotation_centers_on_negated_angles() {
        let proj = projection(-30.0, -15.0);
        let p = proj.project(LonLat::new(30.0, 15.0));
        assert_close(p.x, 400.0, 1e-9);
        assert_close(p.y, 300.0, 1e-9);

        let center = proj.invert(proj.translate()).expect("centre");
        assert_close(center.lon_deg, 30.0, 1e-9);
        assert_close(center.lat_deg, 15.0, 1e-9);
    }

    #[test]
    fn far_side_is_not_visible() {
        let proj = projection(0.0, -15.0);
        assert!(proj.is_visible(LonLat::new(10.0, 20.0)));
        assert!(!proj.is_visible(LonLat::new(180.0, -15.0)));
        assert!(!proj.is_visible(LonLat::new(170.0, 0.0)));
    }

    #[test]
    fn invert_is_inverse_of_project_on_near_side() {
        let proj = projection(37.0, -22.0);
        for &(lon, lat) in &[
            (-37.0, 22.0),
            (-10.0, 40.0),
            (-60.0, 0.0),
            (-37.0, -30.0),
        ] {
            let p = LonLat::new(lon, lat);
            assert!(proj.is_visible(p));
            let screen = proj.project(p);
            let back = proj.invert(screen).expect("inverts");
            assert_close(back.lon_deg, lon, 1e-7);
            assert_close(back.lat_deg, lat, 1e-7);
        }
    }

    #[test]
    fn invert_outside_disc_fails() {
        let proj = projection(0.0, 0.0);
        assert!(proj.invert(Vec2::new(400.0, 300.0)).is_some());
        assert!(proj.invert(Vec2::new(400.0 + 200.5, 300.0)).is_none());
        assert!(proj.invert(Vec2::new(0.0, 0.0)).is_none());
        let degenerate = Orthographic::new(0.0, Vec2::new(0.0, 0.0));
        assert!(degenerate.invert(Vec2::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn rotate_unrotate_round_trip() {
        let proj = projection(123.0, 45.0);
        let v = LonLat::new(12.0, -34.0).to_unit();
        let back = proj.unrotate(proj.rotate(v));
        assert_close(back.x, v.x, 1e-12);
        assert_close(back.y, v.y, 1e-12);
        assert_close(back.z, v.z, 1e-12);
    }
}
