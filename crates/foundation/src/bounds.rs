use crate::math::Vec2;

/// Drawing-surface dimensions in pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn center(self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn rect(self) -> Aabb2 {
        Aabb2::new([0.0, 0.0], [self.width, self.height])
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(800.0, 800.0)
    }
}

/// Axis-aligned bounding box in screen space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    /// Half-open containment: the max edges are outside, matching pixel
    /// addressing where `x == width` is already off the surface.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min[0] && p.y >= self.min[1] && p.x < self.max[0] && p.y < self.max[1]
    }
}
