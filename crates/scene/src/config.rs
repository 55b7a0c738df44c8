use foundation::CanvasSize;
use foundation::math::Rotation;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WORLD_URL: &str =
    "https://cdn.jsdelivr.net/npm/world-atlas@2/countries-110m.json";

/// Interaction tuning. Every field has a default, so partial JSON works.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Degrees of rotation per pixel of drag.
    pub drag_sensitivity: f64,
    /// Absolute latitude bound for the rotation, in degrees.
    pub latitude_limit_deg: f64,
    /// Pixels added to or removed from the scale per wheel notch.
    pub zoom_step: f64,
    pub min_scale: f64,
    /// Upper scale bound as a multiple of the canvas width.
    pub max_scale_factor: f64,
    /// `[λ, φ]` in degrees.
    pub initial_rotation: [f64; 2],
    /// Initial scale is the canvas width divided by this.
    pub initial_scale_divisor: f64,
    pub hover_enabled: bool,
    /// Half-width of the square searched around the pointer.
    pub hover_tolerance_px: u32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            drag_sensitivity: 0.2,
            latitude_limit_deg: 90.0,
            zoom_step: 60.0,
            min_scale: 50.0,
            max_scale_factor: 2.0,
            initial_rotation: [0.0, -15.0],
            initial_scale_divisor: 2.2,
            hover_enabled: true,
            hover_tolerance_px: 3,
        }
    }
}

impl ControlConfig {
    pub fn initial_rotation(&self) -> Rotation {
        Rotation::new(self.initial_rotation[0], self.initial_rotation[1])
    }

    pub fn max_scale(&self, canvas: CanvasSize) -> f64 {
        self.max_scale_factor * canvas.width
    }

    /// Clamp into `[min_scale, max_scale]`. On canvases too narrow for that
    /// range to exist the lower bound wins.
    pub fn clamp_scale(&self, scale: f64, canvas: CanvasSize) -> f64 {
        scale.min(self.max_scale(canvas)).max(self.min_scale)
    }

    pub fn initial_scale(&self, canvas: CanvasSize) -> f64 {
        self.clamp_scale(canvas.width / self.initial_scale_divisor, canvas)
    }
}

/// Where boundary data comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub url: String,
    /// Topology object to expand; `land` gives a single merged shape.
    pub object: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_WORLD_URL.to_string(),
            object: formats::DEFAULT_OBJECT.to_string(),
        }
    }
}

/// How the canvas is sized from the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CanvasSizing {
    /// Square canvas filling the space under a fixed header.
    SquareBelowHeader { header_px: f64 },
    /// Full width, height minus the header.
    FullBelowHeader { header_px: f64 },
}

impl Default for CanvasSizing {
    fn default() -> Self {
        CanvasSizing::SquareBelowHeader { header_px: 56.0 }
    }
}

impl CanvasSizing {
    pub fn canvas_size(&self, viewport_width: f64, viewport_height: f64) -> CanvasSize {
        match *self {
            CanvasSizing::SquareBelowHeader { header_px } => {
                let side = viewport_width.min(viewport_height - header_px);
                CanvasSize::new(side, side)
            }
            CanvasSizing::FullBelowHeader { header_px } => {
                CanvasSize::new(viewport_width, viewport_height - header_px)
            }
        }
    }
}
