//! Rotation, zoom, drag and hover state of the globe view.

use foundation::CanvasSize;
use foundation::math::{Orthographic, Rotation, Vec2};

use crate::config::ControlConfig;
use crate::shape::ShapeId;

/// Pointer cursor the surface should show.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Cursor {
    Grab,
    Grabbing,
    Pointer,
}

impl Cursor {
    /// CSS `cursor` value.
    pub fn css(self) -> &'static str {
        match self {
            Cursor::Grab => "grab",
            Cursor::Grabbing => "grabbing",
            Cursor::Pointer => "pointer",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewState {
    rotation: Rotation,
    scale: f64,
    canvas: CanvasSize,
    dragging: bool,
    last_pointer: Vec2,
    hovered: Option<ShapeId>,
    controls: ControlConfig,
}

impl ViewState {
    pub fn new(controls: ControlConfig, canvas: CanvasSize) -> Self {
        Self {
            rotation: controls.initial_rotation(),
            scale: controls.initial_scale(canvas),
            canvas,
            dragging: false,
            last_pointer: Vec2::new(0.0, 0.0),
            hovered: None,
            controls,
        }
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn hovered(&self) -> Option<ShapeId> {
        self.hovered
    }

    pub fn controls(&self) -> &ControlConfig {
        &self.controls
    }

    /// Projection centred on the canvas for the current rotation and scale.
    pub fn projection(&self) -> Orthographic {
        Orthographic::new(self.scale, self.canvas.center()).with_rotation(self.rotation)
    }

    pub fn cursor(&self) -> Cursor {
        if self.dragging {
            Cursor::Grabbing
        } else if self.hovered.is_some() {
            Cursor::Pointer
        } else {
            Cursor::Grab
        }
    }

    pub fn pointer_down(&mut self, pos: Vec2) {
        self.dragging = true;
        self.last_pointer = pos;
    }

    /// Rotate by the pointer delta while dragging. Returns whether the
    /// rotation changed.
    pub fn drag_to(&mut self, pos: Vec2) -> bool {
        if !self.dragging {
            return false;
        }
        let delta = pos - self.last_pointer;
        self.last_pointer = pos;

        let k = self.controls.drag_sensitivity;
        let limit = self.controls.latitude_limit_deg;
        let before = self.rotation;
        self.rotation.lambda_deg += delta.x * k;
        self.rotation.phi_deg = (self.rotation.phi_deg - delta.y * k).clamp(-limit, limit);
        self.rotation != before
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    /// Step the zoom by one notch in the direction of `delta_y`; scrolling
    /// down zooms out. Returns whether the scale changed.
    pub fn zoom(&mut self, delta_y: f64) -> bool {
        let step = if delta_y > 0.0 {
            -self.controls.zoom_step
        } else if delta_y < 0.0 {
            self.controls.zoom_step
        } else {
            return false;
        };
        let before = self.scale;
        self.scale = self.controls.clamp_scale(self.scale + step, self.canvas);
        self.scale != before
    }

    /// Adopt a new canvas size, pulling the scale back into range.
    pub fn resize(&mut self, canvas: CanvasSize) {
        self.canvas = canvas;
        self.scale = self.controls.clamp_scale(self.scale, canvas);
    }

    /// Returns whether the hovered shape changed.
    pub fn set_hovered(&mut self, hovered: Option<ShapeId>) -> bool {
        let changed = self.hovered != hovered;
        self.hovered = hovered;
        changed
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        let limit = self.controls.latitude_limit_deg;
        self.rotation = Rotation {
            phi_deg: rotation.phi_deg.clamp(-limit, limit),
            ..rotation
        };
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = self.controls.clamp_scale(scale, self.canvas);
    }
}
