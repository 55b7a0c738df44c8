use foundation::math::Vec2;

use crate::paint::{Paint, Stroke};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum FillRule {
    NonZero,
    #[default]
    EvenOdd,
}

/// Closed polylines in surface pixels. Each subpath is implicitly closed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    pub subpaths: Vec<Vec<Vec2>>,
}

impl Path {
    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    pub fn push(&mut self, subpath: Vec<Vec2>) {
        if subpath.len() >= 3 {
            self.subpaths.push(subpath);
        }
    }

    pub fn points(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.subpaths.iter().flatten().copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    Clear {
        width: f64,
        height: f64,
    },
    FillCircle {
        center: Vec2,
        radius: f64,
        paint: Paint,
    },
    DrawPath {
        path: Path,
        fill: Option<Paint>,
        stroke: Option<Stroke>,
        rule: FillRule,
    },
}

/// Display list for one redraw, replayed by a backend in order.
#[derive(Debug, Clone, Default)]
pub struct RenderFrame {
    pub width: f64,
    pub height: f64,
    pub commands: Vec<RenderCommand>,
}

impl RenderFrame {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }
}
