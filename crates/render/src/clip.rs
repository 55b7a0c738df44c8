//! Hemisphere clipping of lon/lat rings.
//!
//! Rings are rotated into view space, where the visible hemisphere is
//! `x > 0`, and cut along great-circle edges. Wherever a ring leaves the
//! visible side, the cut is closed along the horizon circle to the point
//! where the ring re-enters. Rings enclose their smaller side, so a ring
//! without any visible vertex lies wholly on the far side.
//!
//! Edges are resampled on screen, so a long edge is drawn along its great
//! circle rather than as a straight chord between its projected ends.

use std::f64::consts::{PI, TAU};

use formats::{GeoPoint, Polygon};
use foundation::math::{Orthographic, Vec2, Vec3, ring_contains};
use scene::Shape;

use crate::frame::Path;

/// Angular step used when walking along the horizon.
const HORIZON_STEP_RAD: f64 = 6.0 * PI / 180.0;

/// Largest gap, in pixels, left between a drawn chord and its arc.
const RESAMPLE_TOLERANCE_PX: f64 = 0.5;

const MAX_RESAMPLE_DEPTH: u32 = 12;

fn visible(v: Vec3) -> bool {
    v.x > 0.0
}

/// Point where the edge `a → b` meets the horizon. `a` and `b` must lie on
/// opposite sides.
fn horizon_crossing(a: Vec3, b: Vec3) -> Vec3 {
    let t = a.x / (a.x - b.x);
    let p = a + (b - a).scale(t);
    Vec3::new(0.0, p.y, p.z)
        .normalize()
        .or_else(|| Vec3::new(0.0, a.y, a.z).normalize())
        .unwrap_or(Vec3::new(0.0, 1.0, 0.0))
}

fn horizon_point(theta: f64) -> Vec3 {
    Vec3::new(0.0, theta.cos(), theta.sin())
}

/// Push the screen points needed to draw the great-circle arc `a → b`
/// within tolerance, excluding both ends.
fn push_resampled(out: &mut Vec<Vec2>, projection: &Orthographic, a: Vec3, b: Vec3, depth: u32) {
    if depth == 0 {
        return;
    }
    let Some(mid) = (a + b).normalize() else {
        return;
    };
    let pa = projection.project_rotated(a);
    let pb = projection.project_rotated(b);
    let pm = projection.project_rotated(mid);
    let chord_mid = Vec2::new((pa.x + pb.x) * 0.5, (pa.y + pb.y) * 0.5);
    if (pm - chord_mid).length() <= RESAMPLE_TOLERANCE_PX {
        return;
    }
    push_resampled(out, projection, a, mid, depth - 1);
    out.push(pm);
    push_resampled(out, projection, mid, b, depth - 1);
}

/// Walk the horizon from `from` to `to` (exclusive at both ends), taking
/// whichever way round runs through the ring's interior.
fn push_horizon_arc(
    out: &mut Vec<Vec2>,
    projection: &Orthographic,
    from: Vec3,
    to: Vec3,
    view_ring: &[Vec3],
) {
    let t0 = from.z.atan2(from.y);
    let t1 = to.z.atan2(to.y);
    let mut short = (t1 - t0).rem_euclid(TAU);
    if short > PI {
        short -= TAU;
    }
    let long = if short >= 0.0 {
        short - TAU
    } else {
        short + TAU
    };

    let inside = |sweep: f64| ring_contains(horizon_point(t0 + sweep * 0.5), view_ring);
    let sweep = if !inside(short) && inside(long) {
        long
    } else {
        short
    };

    let steps = (sweep.abs() / HORIZON_STEP_RAD).ceil() as usize;
    for k in 1..steps {
        let theta = t0 + sweep * k as f64 / steps as f64;
        out.push(projection.project_rotated(horizon_point(theta)));
    }
}

/// Project the visible part of a ring to screen space.
///
/// Returns an empty vector when nothing of the ring is visible.
pub fn clip_ring(projection: &Orthographic, ring: &[GeoPoint]) -> Vec<Vec2> {
    let mut view: Vec<Vec3> = ring
        .iter()
        .map(|p| projection.rotate(p.lon_lat().to_unit()))
        .collect();
    if view.len() > 1 && view.first() == view.last() {
        view.pop();
    }
    if view.len() < 3 {
        return Vec::new();
    }

    let Some(start) = view.iter().position(|&v| visible(v)) else {
        return Vec::new();
    };

    // Start on the visible side so every exit is followed by an entry.
    view.rotate_left(start);
    let n = view.len();
    let mut out = Vec::with_capacity(n + 32);
    out.push(projection.project_rotated(view[0]));
    let mut exit: Option<Vec3> = None;

    for i in 0..n {
        let a = view[i];
        let b = view[(i + 1) % n];
        let closing = i + 1 == n;
        match (visible(a), visible(b)) {
            (true, true) => {
                push_resampled(&mut out, projection, a, b, MAX_RESAMPLE_DEPTH);
                if !closing {
                    out.push(projection.project_rotated(b));
                }
            }
            (true, false) => {
                let c = horizon_crossing(a, b);
                push_resampled(&mut out, projection, a, c, MAX_RESAMPLE_DEPTH);
                out.push(projection.project_rotated(c));
                exit = Some(c);
            }
            (false, true) => {
                let c = horizon_crossing(a, b);
                if let Some(from) = exit.take() {
                    push_horizon_arc(&mut out, projection, from, c, &view);
                }
                out.push(projection.project_rotated(c));
                push_resampled(&mut out, projection, c, b, MAX_RESAMPLE_DEPTH);
                if !closing {
                    out.push(projection.project_rotated(b));
                }
            }
            (false, false) => {}
        }
    }
    out
}

/// Clipped rings of a polygon; rings with nothing visible are left out.
pub fn clip_polygon(projection: &Orthographic, polygon: &Polygon) -> Vec<Vec<Vec2>> {
    polygon
        .iter()
        .map(|ring| clip_ring(projection, ring))
        .filter(|ring| ring.len() >= 3)
        .collect()
}

/// Screen path of every visible ring of a shape, to be filled even-odd.
pub fn shape_path(projection: &Orthographic, shape: &Shape) -> Path {
    let mut path = Path::default();
    for polygon in shape.polygons() {
        for ring in clip_polygon(projection, polygon) {
            path.push(ring);
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundation::math::{LonLat, Rotation};
    use pretty_assertions::assert_eq;

    const CENTER: Vec2 = Vec2 { x: 300.0, y: 300.0 };

    fn projection() -> Orthographic {
        Orthographic::new(200.0, CENTER).with_rotation(Rotation::new(0.0, 0.0))
    }

    fn ring(points: &[(f64, f64)]) -> Vec<GeoPoint> {
        points
            .iter()
            .map(|&(lon, lat)| GeoPoint::new(lon, lat))
            .collect()
    }

    fn on_rim(p: Vec2) -> bool {
        ((p - CENTER).length() - 200.0).abs() < 1e-6
    }

    fn within_disc(p: Vec2) -> bool {
        (p - CENTER).length() <= 200.0 + 1e-6
    }

    /// Even-odd fill test over screen rings.
    fn fill_contains(rings: &[Vec<Vec2>], p: Vec2) -> bool {
        let mut inside = false;
        for ring in rings {
            for i in 0..ring.len() {
                let a = ring[i];
                let b = ring[(i + 1) % ring.len()];
                if (a.y > p.y) != (b.y > p.y) {
                    let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                    if p.x < x {
                        inside = !inside;
                    }
                }
            }
        }
        inside
    }

    #[test]
    fn visible_ring_projects_every_vertex() {
        let square = ring(&[
            (-5.0, -5.0),
            (5.0, -5.0),
            (5.0, 5.0),
            (-5.0, 5.0),
            (-5.0, -5.0),
        ]);
        let out = clip_ring(&projection(), &square);
        assert_eq!(out.len(), 4);
        let expected = projection().project(square[0].lon_lat());
        assert_eq!(out[0], expected);
    }

    #[test]
    fn long_edges_follow_their_great_circles() {
        let wide = ring(&[
            (-40.0, -30.0),
            (40.0, -30.0),
            (40.0, 30.0),
            (-40.0, 30.0),
            (-40.0, -30.0),
        ]);
        let proj = projection();
        let out = clip_ring(&proj, &wide);
        assert!(out.len() > 4, "got {} points", out.len());

        let units: Vec<Vec3> = wide.iter().map(|p| p.lon_lat().to_unit()).collect();
        let normals: Vec<Vec3> = units.windows(2).map(|w| w[0].cross(w[1])).collect();
        for &p in &out {
            let unit = proj.invert(p).expect("inside the disc").to_unit();
            assert!(
                normals
                    .iter()
                    .any(|n| n.normalize().is_some_and(|n| n.dot(unit).abs() < 1e-9)),
                "{p:?} is off every edge"
            );
        }
        for pair in out.windows(2) {
            assert!((pair[1] - pair[0]).length() < 40.0);
        }
    }

    #[test]
    fn fill_agrees_with_containment_near_the_rim() {
        // Long edges that cross the eastern limb.
        let shape = ring(&[
            (30.0, -40.0),
            (100.0, -30.0),
            (120.0, 30.0),
            (40.0, 50.0),
            (30.0, -40.0),
        ]);
        let units: Vec<Vec3> = shape.iter().map(|p| p.lon_lat().to_unit()).collect();
        let proj = projection();
        let drawn = vec![clip_ring(&proj, &shape)];

        let mut samples = 0;
        let mut inside = 0;
        let mut mismatches = 0;
        for i in 0..80 {
            for j in 0..80 {
                let screen = Vec2::new(102.5 + 5.0 * i as f64, 102.5 + 5.0 * j as f64);
                let Some(geo) = proj.invert(screen) else {
                    continue;
                };
                samples += 1;
                let hit = ring_contains(geo.to_unit(), &units);
                inside += usize::from(hit);
                if hit != fill_contains(&drawn, screen) {
                    mismatches += 1;
                }
            }
        }
        assert!(inside > 200, "only {inside} of {samples} samples inside");
        assert!(
            mismatches * 100 <= samples,
            "{mismatches} of {samples} samples disagree"
        );
    }

    #[test]
    fn far_side_ring_is_dropped() {
        let back = ring(&[
            (170.0, -10.0),
            (-170.0, -10.0),
            (-170.0, 10.0),
            (170.0, 10.0),
            (170.0, -10.0),
        ]);
        assert!(clip_ring(&projection(), &back).is_empty());
    }

    #[test]
    fn straddling_ring_is_cut_at_the_horizon() {
        // Spans the eastern limb at longitude 90.
        let limb = ring(&[
            (70.0, -20.0),
            (110.0, -20.0),
            (110.0, 20.0),
            (70.0, 20.0),
            (70.0, -20.0),
        ]);
        let out = clip_ring(&projection(), &limb);
        assert!(out.len() >= 4, "got {} points", out.len());
        assert!(out.iter().all(|&p| within_disc(p)));
        assert!(out.iter().filter(|&&p| on_rim(p)).count() >= 2);

        // The walk along the rim stays between the two crossings, which sit
        // just beyond latitude 21 where the edges bulge poleward.
        let top = projection()
            .project_rotated(horizon_point(22f64.to_radians()))
            .y;
        let bottom = projection()
            .project_rotated(horizon_point(-22f64.to_radians()))
            .y;
        assert!(
            out.iter()
                .filter(|&&p| on_rim(p))
                .all(|p| p.y >= top - 1.0 && p.y <= bottom + 1.0)
        );
    }

    #[test]
    fn polar_cap_seen_edge_on() {
        // A cap around the north pole, viewed from the equator: its far half
        // is hidden and the outline closes along the rim.
        let cap: Vec<GeoPoint> = (0..=36)
            .map(|k| GeoPoint::new(-180.0 + 10.0 * k as f64, 60.0))
            .collect();
        let out = clip_ring(&projection(), &cap);
        assert!(!out.is_empty());
        assert!(out.iter().all(|&p| within_disc(p)));
        // Nothing below the cap's near edge.
        let lowest = projection().project(LonLat::new(0.0, 60.0)).y;
        assert!(out.iter().all(|p| p.y <= lowest + 1e-6));
    }
}
