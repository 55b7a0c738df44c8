//! Headless globe sessions: build a globe at a fixed view and feed it events.

use anyhow::{Context, Result};
use foundation::CanvasSize;
use foundation::math::Rotation;
use render::ViewerConfig;
use runtime::InputEvent;
use scene::{Globe, ShapeSet};
use tracing::debug;

/// View parameters given on the command line; unset fields keep the
/// configured initial view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOverrides {
    pub width: f64,
    pub height: f64,
    pub rotation: Option<Rotation>,
    pub scale: Option<f64>,
}

pub fn build_globe(config: &ViewerConfig, view: ViewOverrides, shapes: ShapeSet) -> Globe {
    let mut globe = Globe::new(
        config.controls,
        config.sizing,
        CanvasSize::new(view.width, view.height),
    );
    if let Some(rotation) = view.rotation {
        globe.view_mut().set_rotation(rotation);
    }
    if let Some(scale) = view.scale {
        globe.view_mut().set_scale(scale);
    }
    let _ = globe.set_shapes(shapes);
    globe
}

pub fn parse_script(text: &str) -> Result<Vec<InputEvent>> {
    serde_json::from_str(text).context("event script must be a JSON array of input events")
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub redraws: usize,
}

/// Apply events in order, counting the ones that asked for a redraw.
pub fn replay(globe: &mut Globe, events: &[InputEvent]) -> ReplaySummary {
    let mut summary = ReplaySummary::default();
    for &event in events {
        summary.events += 1;
        if globe.handle(event).is_needed() {
            summary.redraws += 1;
        }
    }
    debug!(
        events = summary.events,
        redraws = summary.redraws,
        "replayed script"
    );
    summary
}
