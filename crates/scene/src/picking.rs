use foundation::CanvasSize;
use foundation::math::{Orthographic, Vec2};

use crate::shape::{ShapeId, ShapeSet};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PickOptions {
    /// Half-width, in pixels, of the square searched around the pointer.
    pub tolerance_px: u32,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self { tolerance_px: 3 }
    }
}

/// Shape under a screen position, searching a small square around it.
///
/// Ordering contract:
/// - Offsets are visited with dx as the outer loop and dy as the inner loop,
///   each from `-tolerance` to `+tolerance`.
/// - At each offset, shapes are tested in load order; the first hit wins.
///
/// Offsets outside the canvas or outside the globe disc are skipped.
pub fn pick_screen(
    shapes: &ShapeSet,
    projection: &Orthographic,
    canvas: CanvasSize,
    pos: Vec2,
    opts: PickOptions,
) -> Option<ShapeId> {
    if shapes.is_empty() {
        return None;
    }
    let bounds = canvas.rect();
    let t = i64::from(opts.tolerance_px);

    for dx in -t..=t {
        for dy in -t..=t {
            let sample = Vec2::new(pos.x + dx as f64, pos.y + dy as f64);
            if !bounds.contains(sample) {
                continue;
            }
            let Some(geo) = projection.invert(sample) else {
                continue;
            };
            if let Some(id) = shapes.find_containing(geo.to_unit()) {
                return Some(id);
            }
        }
    }
    None
}
