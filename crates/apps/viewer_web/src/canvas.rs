use std::f64::consts::TAU;

use render::{ColorStop, FillRule, Paint, Path, RenderCommand, RenderFrame};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasGradient, CanvasRenderingContext2d, CanvasWindingRule};

fn ctx_set_fill_style(ctx: &CanvasRenderingContext2d, value: &JsValue) {
    let _ = js_sys::Reflect::set(ctx.as_ref(), &JsValue::from_str("fillStyle"), value);
}

fn ctx_set_stroke_style(ctx: &CanvasRenderingContext2d, value: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("strokeStyle"),
        &JsValue::from_str(value),
    );
}

fn add_stops(gradient: &CanvasGradient, stops: &[ColorStop]) -> Result<(), JsValue> {
    for stop in stops {
        gradient.add_color_stop(stop.offset as f32, &stop.color.to_hex())?;
    }
    Ok(())
}

fn set_fill(ctx: &CanvasRenderingContext2d, paint: &Paint) -> Result<(), JsValue> {
    match paint {
        Paint::Solid(color) => ctx_set_fill_style(ctx, &JsValue::from_str(&color.to_hex())),
        Paint::LinearGradient { from, to, stops } => {
            let gradient = ctx.create_linear_gradient(from.x, from.y, to.x, to.y);
            add_stops(&gradient, stops)?;
            ctx_set_fill_style(ctx, gradient.as_ref());
        }
        Paint::RadialGradient {
            center,
            radius,
            stops,
        } => {
            let gradient =
                ctx.create_radial_gradient(center.x, center.y, 0.0, center.x, center.y, *radius)?;
            add_stops(&gradient, stops)?;
            ctx_set_fill_style(ctx, gradient.as_ref());
        }
    }
    Ok(())
}

fn trace_path(ctx: &CanvasRenderingContext2d, path: &Path) {
    for subpath in &path.subpaths {
        let mut points = subpath.iter();
        let Some(first) = points.next() else {
            continue;
        };
        ctx.move_to(first.x, first.y);
        for p in points {
            ctx.line_to(p.x, p.y);
        }
        ctx.close_path();
    }
}

/// Replay a display list onto a 2D context.
pub fn replay(ctx: &CanvasRenderingContext2d, frame: &RenderFrame) -> Result<(), JsValue> {
    for command in &frame.commands {
        match command {
            RenderCommand::Clear { width, height } => ctx.clear_rect(0.0, 0.0, *width, *height),
            RenderCommand::FillCircle {
                center,
                radius,
                paint,
            } => {
                ctx.begin_path();
                ctx.arc(center.x, center.y, *radius, 0.0, TAU)?;
                set_fill(ctx, paint)?;
                ctx.fill();
            }
            RenderCommand::DrawPath {
                path,
                fill,
                stroke,
                rule,
            } => {
                ctx.begin_path();
                trace_path(ctx, path);
                if let Some(paint) = fill {
                    set_fill(ctx, paint)?;
                    let rule = match rule {
                        FillRule::EvenOdd => CanvasWindingRule::Evenodd,
                        FillRule::NonZero => CanvasWindingRule::Nonzero,
                    };
                    ctx.fill_with_canvas_winding_rule(rule);
                }
                if let Some(stroke) = stroke {
                    ctx_set_stroke_style(ctx, &stroke.color.to_hex());
                    ctx.set_line_width(stroke.width);
                    ctx.stroke();
                }
            }
        }
    }
    Ok(())
}
