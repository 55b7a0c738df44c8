//! SVG backend for display lists.

use std::fmt::Write;

use foundation::math::Vec2;

use crate::frame::{FillRule, Path, RenderCommand, RenderFrame};
use crate::paint::{ColorStop, Paint, Stroke};

fn num(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn path_data(path: &Path) -> String {
    let mut d = String::new();
    for subpath in &path.subpaths {
        for (i, p) in subpath.iter().enumerate() {
            let op = if i == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{op}{},{}", num(p.x), num(p.y));
        }
        d.push('Z');
    }
    d
}

fn write_stops(defs: &mut String, stops: &[ColorStop]) {
    for stop in stops {
        let _ = write!(
            defs,
            r#"<stop offset="{}" stop-color="{}"/>"#,
            num(stop.offset),
            stop.color.to_hex()
        );
    }
}

/// Gradients become `<defs>` entries referenced by id.
fn paint_ref(paint: &Paint, defs: &mut String, next_id: &mut usize) -> String {
    match paint {
        Paint::Solid(color) => color.to_hex(),
        Paint::LinearGradient { from, to, stops } => {
            let id = format!("g{next_id}");
            *next_id += 1;
            let _ = write!(
                defs,
                r#"<linearGradient id="{id}" gradientUnits="userSpaceOnUse" x1="{}" y1="{}" x2="{}" y2="{}">"#,
                num(from.x),
                num(from.y),
                num(to.x),
                num(to.y)
            );
            write_stops(defs, stops);
            defs.push_str("</linearGradient>");
            format!("url(#{id})")
        }
        Paint::RadialGradient {
            center,
            radius,
            stops,
        } => {
            let id = format!("g{next_id}");
            *next_id += 1;
            let _ = write!(
                defs,
                r#"<radialGradient id="{id}" gradientUnits="userSpaceOnUse" cx="{}" cy="{}" r="{}">"#,
                num(center.x),
                num(center.y),
                num(*radius)
            );
            write_stops(defs, stops);
            defs.push_str("</radialGradient>");
            format!("url(#{id})")
        }
    }
}

fn stroke_attrs(stroke: Option<&Stroke>) -> String {
    match stroke {
        Some(s) => format!(
            r#" stroke="{}" stroke-width="{}""#,
            s.color.to_hex(),
            num(s.width)
        ),
        None => String::new(),
    }
}

/// Render a frame as a standalone SVG document, one element per command.
pub fn to_svg(frame: &RenderFrame) -> String {
    let mut defs = String::new();
    let mut body = String::new();
    let mut next_id = 0usize;

    for command in &frame.commands {
        match command {
            RenderCommand::Clear { width, height } => {
                let _ = write!(
                    body,
                    r#"<rect x="0" y="0" width="{}" height="{}" fill="none"/>"#,
                    num(*width),
                    num(*height)
                );
            }
            RenderCommand::FillCircle {
                center,
                radius,
                paint,
            } => {
                let fill = paint_ref(paint, &mut defs, &mut next_id);
                let Vec2 { x, y } = *center;
                let _ = write!(
                    body,
                    r#"<circle cx="{}" cy="{}" r="{}" fill="{fill}"/>"#,
                    num(x),
                    num(y),
                    num(*radius)
                );
            }
            RenderCommand::DrawPath {
                path,
                fill,
                stroke,
                rule,
            } => {
                let fill = match fill {
                    Some(paint) => paint_ref(paint, &mut defs, &mut next_id),
                    None => "none".to_string(),
                };
                let rule = match rule {
                    FillRule::EvenOdd => "evenodd",
                    FillRule::NonZero => "nonzero",
                };
                let _ = write!(
                    body,
                    r#"<path d="{}" fill="{fill}" fill-rule="{rule}"{}/>"#,
                    path_data(path),
                    stroke_attrs(stroke.as_ref())
                );
            }
        }
    }

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = num(frame.width),
        h = num(frame.height)
    );
    if !defs.is_empty() {
        let _ = write!(out, "<defs>{defs}</defs>");
    }
    out.push_str(&body);
    out.push_str("</svg>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{Color, GlobeStyle};
    use pretty_assertions::assert_eq;

    fn triangle() -> Path {
        Path {
            subpaths: vec![vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(10.5, 0.0),
                Vec2::new(10.0, 10.25),
            ]],
        }
    }

    #[test]
    fn one_element_per_command() {
        let style = GlobeStyle::default();
        let center = Vec2::new(50.0, 50.0);
        let mut frame = RenderFrame::new(100.0, 100.0);
        frame.push(RenderCommand::Clear {
            width: 100.0,
            height: 100.0,
        });
        frame.push(RenderCommand::FillCircle {
            center,
            radius: 40.0,
            paint: style.ocean_paint(center, 40.0),
        });
        frame.push(RenderCommand::DrawPath {
            path: triangle(),
            fill: Some(style.land_paint(center, 40.0)),
            stroke: Some(style.land_outline),
            rule: FillRule::EvenOdd,
        });

        let svg = to_svg(&frame);
        assert_eq!(svg.matches("<rect ").count(), 1);
        assert_eq!(svg.matches("<circle ").count(), 1);
        assert_eq!(svg.matches("<path ").count(), 1);
        assert!(svg.contains(r#"<radialGradient id="g0""#));
        assert!(svg.contains(r#"<linearGradient id="g1""#));
        assert!(svg.contains(r##"stroke="#555555" stroke-width="0.5""##));
    }

    #[test]
    fn path_data_uses_compact_numbers() {
        let mut frame = RenderFrame::new(20.0, 20.0);
        frame.push(RenderCommand::DrawPath {
            path: triangle(),
            fill: Some(Paint::Solid(Color::rgb(0xf0, 0x75, 0x1f))),
            stroke: None,
            rule: FillRule::EvenOdd,
        });
        assert_eq!(
            to_svg(&frame),
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20" viewBox="0 0 20 20">"#,
                r##"<path d="M0,0L10.5,0L10,10.25Z" fill="#f0751f" fill-rule="evenodd"/>"##,
                "</svg>\n"
            )
        );
    }

    #[test]
    fn empty_frame_is_an_empty_document() {
        let svg = to_svg(&RenderFrame::new(0.0, 0.0));
        assert_eq!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"0\" height=\"0\" viewBox=\"0 0 0 0\"></svg>\n"
        );
    }
}
