use foundation::CanvasSize;
use foundation::math::Orthographic;
use scene::{Globe, Shape};
use tracing::trace;

use crate::clip::shape_path;
use crate::frame::{FillRule, RenderCommand, RenderFrame};
use crate::paint::{GlobeStyle, Paint};

/// Display list for the globe's current state.
pub fn draw_globe(globe: &Globe, style: &GlobeStyle) -> RenderFrame {
    draw_view(
        &globe.projection(),
        globe.canvas(),
        globe.shapes().iter(),
        globe.hovered_shape(),
        style,
    )
}

/// Ocean disc, every shape on the near side, then the hovered shape on top.
///
/// A zero-width canvas yields an empty frame.
pub fn draw_view<'a>(
    projection: &Orthographic,
    canvas: CanvasSize,
    shapes: impl IntoIterator<Item = &'a Shape>,
    hovered: Option<&Shape>,
    style: &GlobeStyle,
) -> RenderFrame {
    let mut frame = RenderFrame::new(canvas.width, canvas.height);
    if canvas.width <= 0.0 {
        return frame;
    }

    let center = projection.translate();
    let radius = projection.scale();

    frame.push(RenderCommand::Clear {
        width: canvas.width,
        height: canvas.height,
    });
    frame.push(RenderCommand::FillCircle {
        center,
        radius,
        paint: style.ocean_paint(center, radius),
    });

    let land = style.land_paint(center, radius);
    let mut culled = 0usize;
    for shape in shapes {
        let path = shape_path(projection, shape);
        if path.is_empty() {
            culled += 1;
            continue;
        }
        frame.push(RenderCommand::DrawPath {
            path,
            fill: Some(land.clone()),
            stroke: Some(style.land_outline),
            rule: FillRule::EvenOdd,
        });
    }

    if let Some(shape) = hovered {
        let path = shape_path(projection, shape);
        if !path.is_empty() {
            frame.push(RenderCommand::DrawPath {
                path,
                fill: Some(Paint::Solid(style.hover_fill)),
                stroke: Some(style.hover_outline),
                rule: FillRule::EvenOdd,
            });
        }
    }

    trace!(commands = frame.commands.len(), culled, "globe frame");
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use formats::FeatureCollection;
    use foundation::math::{LonLat, Rotation};
    use runtime::InputEvent;
    use scene::{CanvasSizing, ControlConfig, ShapeSet};

    const TWO_SQUARES: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"name":"Near"},"geometry":{"type":"Polygon",
         "coordinates":[[[-10,-10],[10,-10],[10,10],[-10,10],[-10,-10]]]}},
        {"type":"Feature","properties":{"name":"Far"},"geometry":{"type":"Polygon",
         "coordinates":[[[170,-10],[-170,-10],[-170,10],[170,10],[170,-10]]]}}
    ]}"#;

    fn globe(width: f64) -> Globe {
        let mut g = Globe::new(
            ControlConfig::default(),
            CanvasSizing::default(),
            CanvasSize::new(width, width),
        );
        g.view_mut().set_rotation(Rotation::new(0.0, 0.0));
        let fc = FeatureCollection::from_geojson_str(TWO_SQUARES).unwrap();
        let _ = g.set_shapes(ShapeSet::from_features(&fc));
        g
    }

    #[test]
    fn draws_ocean_then_near_side_land() {
        let frame = draw_globe(&globe(600.0), &GlobeStyle::default());
        assert!(matches!(
            frame.commands.as_slice(),
            [
                RenderCommand::Clear { .. },
                RenderCommand::FillCircle { .. },
                RenderCommand::DrawPath {
                    fill: Some(Paint::LinearGradient { .. }),
                    rule: FillRule::EvenOdd,
                    ..
                },
            ]
        ));
    }

    #[test]
    fn hovered_shape_is_painted_last() {
        let mut g = globe(600.0);
        let p = g.projection().project(LonLat::new(0.0, 0.0));
        let _ = g.handle(InputEvent::PointerMove { x: p.x, y: p.y });
        let frame = draw_globe(&g, &GlobeStyle::default());
        assert_eq!(frame.commands.len(), 4);
        let Some(RenderCommand::DrawPath { fill, stroke, .. }) = frame.commands.last() else {
            panic!("expected hover path last");
        };
        assert_eq!(fill, &Some(Paint::Solid(GlobeStyle::default().hover_fill)));
        assert_eq!(stroke.map(|s| s.width), Some(0.8));
    }

    #[test]
    fn ocean_is_painted_without_shapes() {
        let g = Globe::new(
            ControlConfig::default(),
            CanvasSizing::default(),
            CanvasSize::new(400.0, 400.0),
        );
        let frame = draw_globe(&g, &GlobeStyle::default());
        assert_eq!(frame.commands.len(), 2);
        let RenderCommand::FillCircle { center, radius, .. } = &frame.commands[1] else {
            panic!("expected ocean disc");
        };
        assert_eq!((center.x, center.y), (200.0, 200.0));
        assert_eq!(*radius, g.view().scale());
    }

    #[test]
    fn zero_width_canvas_draws_nothing() {
        let frame = draw_globe(&globe(0.0), &GlobeStyle::default());
        assert!(frame.is_empty());
    }
}
