use foundation::CanvasSize;
use foundation::math::{Orthographic, Vec2};
use runtime::{EventQueue, InputEvent};
use tracing::{debug, trace};

use crate::config::{CanvasSizing, ControlConfig};
use crate::picking::{PickOptions, pick_screen};
use crate::shape::{Shape, ShapeSet};
use crate::view::{Cursor, ViewState};

/// Whether the globe must be drawn again.
#[must_use]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Redraw {
    Needed,
    NotNeeded,
}

impl Redraw {
    pub fn is_needed(self) -> bool {
        self == Redraw::Needed
    }

    fn when(changed: bool) -> Self {
        if changed {
            Redraw::Needed
        } else {
            Redraw::NotNeeded
        }
    }
}

impl std::ops::BitOr for Redraw {
    type Output = Redraw;

    fn bitor(self, rhs: Redraw) -> Redraw {
        Redraw::when(self.is_needed() || rhs.is_needed())
    }
}

/// Shapes plus view state, driven by input events.
#[derive(Debug, Clone)]
pub struct Globe {
    shapes: ShapeSet,
    view: ViewState,
    pick: PickOptions,
    sizing: CanvasSizing,
}

impl Globe {
    pub fn new(controls: ControlConfig, sizing: CanvasSizing, canvas: CanvasSize) -> Self {
        Self {
            shapes: ShapeSet::new(),
            view: ViewState::new(controls, canvas),
            pick: PickOptions {
                tolerance_px: controls.hover_tolerance_px,
            },
            sizing,
        }
    }

    /// Size the canvas from a viewport using the sizing policy.
    pub fn for_viewport(
        controls: ControlConfig,
        sizing: CanvasSizing,
        viewport_width: f64,
        viewport_height: f64,
    ) -> Self {
        Self::new(
            controls,
            sizing,
            sizing.canvas_size(viewport_width, viewport_height),
        )
    }

    pub fn set_shapes(&mut self, shapes: ShapeSet) -> Redraw {
        debug!(count = shapes.len(), "shapes loaded");
        self.shapes = shapes;
        let _ = self.view.set_hovered(None);
        Redraw::Needed
    }

    pub fn handle(&mut self, event: InputEvent) -> Redraw {
        trace!(kind = event.kind(), "input");
        match event {
            InputEvent::PointerDown { x, y } => {
                self.view.pointer_down(Vec2::new(x, y));
                Redraw::NotNeeded
            }
            InputEvent::PointerMove { x, y } => {
                let pos = Vec2::new(x, y);
                if self.view.is_dragging() {
                    Redraw::when(self.view.drag_to(pos))
                } else if self.view.controls().hover_enabled {
                    let hit = pick_screen(
                        &self.shapes,
                        &self.view.projection(),
                        self.view.canvas(),
                        pos,
                        self.pick,
                    );
                    Redraw::when(self.view.set_hovered(hit))
                } else {
                    Redraw::NotNeeded
                }
            }
            InputEvent::PointerUp => {
                self.view.pointer_up();
                Redraw::NotNeeded
            }
            InputEvent::Wheel { delta_y } => Redraw::when(self.view.zoom(delta_y)),
            InputEvent::Resize { width, height } => {
                let canvas = self.sizing.canvas_size(width, height);
                debug!(
                    width = canvas.width,
                    height = canvas.height,
                    "canvas resized"
                );
                self.view.resize(canvas);
                Redraw::Needed
            }
        }
    }

    /// Apply every queued event; a redraw is needed if any event needed one.
    pub fn drain(&mut self, queue: &mut EventQueue) -> Redraw {
        let mut redraw = Redraw::NotNeeded;
        for event in queue.drain() {
            redraw = redraw | self.handle(event);
        }
        redraw
    }

    pub fn projection(&self) -> Orthographic {
        self.view.projection()
    }

    pub fn hovered_shape(&self) -> Option<&Shape> {
        self.view.hovered().and_then(|id| self.shapes.get(id))
    }

    pub fn cursor(&self) -> Cursor {
        self.view.cursor()
    }

    pub fn canvas(&self) -> CanvasSize {
        self.view.canvas()
    }

    pub fn shapes(&self) -> &ShapeSet {
        &self.shapes
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ShapeId;
    use crate::shape::fixtures::countries;
    use foundation::math::{LonLat, Rotation};
    use pretty_assertions::assert_eq;

    fn globe() -> Globe {
        let mut g = Globe::new(
            ControlConfig::default(),
            CanvasSizing::default(),
            CanvasSize::new(800.0, 800.0),
        );
        g.view_mut().set_rotation(Rotation::new(0.0, 0.0));
        let _ = g.set_shapes(countries());
        g
    }

    fn screen_of(g: &Globe, lon: f64, lat: f64) -> Vec2 {
        g.projection().project(LonLat::new(lon, lat))
    }

    #[test]
    fn hover_follows_pointer_when_idle() {
        let mut g = globe();
        let p = screen_of(&g, 10.0, 5.0);
        assert_eq!(
            g.handle(InputEvent::PointerMove { x: p.x, y: p.y }),
            Redraw::Needed
        );
        assert_eq!(g.hovered_shape().and_then(Shape::name), Some("Eastland"));
        assert_eq!(g.cursor(), Cursor::Pointer);

        // Same shape again: nothing to redraw.
        let q = screen_of(&g, 15.0, 5.0);
        assert_eq!(
            g.handle(InputEvent::PointerMove { x: q.x, y: q.y }),
            Redraw::NotNeeded
        );

        let ocean = screen_of(&g, 0.0, 40.0);
        assert_eq!(
            g.handle(InputEvent::PointerMove {
                x: ocean.x,
                y: ocean.y
            }),
            Redraw::Needed
        );
        assert!(g.hovered_shape().is_none());
        assert_eq!(g.cursor(), Cursor::Grab);
    }

    #[test]
    fn dragging_rotates_without_rehovering() {
        let mut g = globe();
        let p = screen_of(&g, -10.0, 0.0);
        let _ = g.handle(InputEvent::PointerMove { x: p.x, y: p.y });
        assert_eq!(g.view().hovered(), Some(ShapeId(0)));

        let _ = g.handle(InputEvent::PointerDown { x: p.x, y: p.y });
        assert_eq!(g.cursor(), Cursor::Grabbing);
        let redraw = g.handle(InputEvent::PointerMove {
            x: p.x + 100.0,
            y: p.y,
        });
        assert!(redraw.is_needed());
        assert!((g.view().rotation().lambda_deg - 20.0).abs() < 1e-9);
        assert_eq!(g.view().hovered(), Some(ShapeId(0)));

        let _ = g.handle(InputEvent::PointerUp);
        assert_eq!(g.cursor(), Cursor::Pointer);
    }

    #[test]
    fn hover_can_be_disabled() {
        let controls = ControlConfig {
            hover_enabled: false,
            ..ControlConfig::default()
        };
        let mut g = Globe::new(
            controls,
            CanvasSizing::default(),
            CanvasSize::new(800.0, 800.0),
        );
        let _ = g.set_shapes(countries());
        let c = g.canvas().center();
        assert_eq!(
            g.handle(InputEvent::PointerMove { x: c.x, y: c.y }),
            Redraw::NotNeeded
        );
        assert!(g.hovered_shape().is_none());
    }

    #[test]
    fn resize_updates_canvas_and_redraws() {
        let mut g = globe();
        let redraw = g.handle(InputEvent::Resize {
            width: 1000.0,
            height: 656.0,
        });
        assert_eq!(redraw, Redraw::Needed);
        assert_eq!(g.canvas(), CanvasSize::new(600.0, 600.0));
        assert_eq!(g.projection().translate(), Vec2::new(300.0, 300.0));
    }

    #[test]
    fn drain_reports_any_redraw() {
        let mut g = globe();
        let mut queue = EventQueue::new();
        queue.push(InputEvent::PointerDown { x: 10.0, y: 10.0 });
        queue.push(InputEvent::PointerUp);
        assert_eq!(g.drain(&mut queue), Redraw::NotNeeded);

        queue.extend([InputEvent::Wheel { delta_y: -1.0 }, InputEvent::PointerUp]);
        assert_eq!(g.drain(&mut queue), Redraw::Needed);
        assert!(queue.is_empty());
    }
}
