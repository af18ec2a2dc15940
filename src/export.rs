//! Writing a plot's render surface to an image or PDF file.
//!
//! Raster drawing goes through tiny-skia onto an opaque white canvas, so the
//! premultiplied pixmap bytes can be handed to `image` as plain RGBA. PDF
//! output is built as an SVG document, parsed by usvg and converted with
//! svg2pdf, so lines stay vector paths.

use std::path::Path;

use image::RgbaImage;
use thiserror::Error;
use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Rect, Stroke, StrokeDash, Transform};

use crate::data::options::Rgb;
use crate::data::surface::{LineKind, RenderSurface};

const MARGIN: f32 = 40.0;
const TICK_HALF_HEIGHT: f64 = 0.4;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot render a {width}x{height} image")]
    EmptyCanvas { width: u32, height: u32 },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("svg parsing failed: {0}")]
    Svg(#[from] usvg::Error),
    #[error("pdf conversion failed: {0}")]
    Pdf(String),
}

/// Maps data coordinates into the pixel rectangle inside the margins.
struct Viewport {
    x: (f64, f64),
    y: (f64, f64),
    area: Rect,
}

impl Viewport {
    fn map(&self, x: f64, y: f64) -> (f32, f32) {
        let span = |(lo, hi): (f64, f64)| if hi == lo { 1.0 } else { hi - lo };
        let fx = (x - self.x.0) / span(self.x);
        let fy = (y - self.y.0) / span(self.y);
        (
            self.area.left() + (fx as f32) * self.area.width(),
            self.area.bottom() - (fy as f32) * self.area.height(),
        )
    }
}

fn paint_for(color: Rgb) -> Paint<'static> {
    let c = color.to_color32();
    let mut paint = Paint::default();
    paint.set_color_rgba8(c.r(), c.g(), c.b(), 255);
    paint.anti_alias = true;
    paint
}

fn stroke_for(width: f32, kind: LineKind) -> Stroke {
    let mut stroke = Stroke {
        width,
        ..Default::default()
    };
    stroke.dash = match kind {
        LineKind::Solid => None,
        LineKind::Dashed => StrokeDash::new(vec![6.0 * width, 4.0 * width], 0.0),
        LineKind::Dotted => StrokeDash::new(vec![width, 2.0 * width], 0.0),
    };
    stroke
}

/// Pixel rectangle inside the margins of a `width × height` canvas.
fn plot_area(width: u32, height: u32) -> Option<Rect> {
    let mx = MARGIN.min(width as f32 / 4.0);
    let my = MARGIN.min(height as f32 / 4.0);
    Rect::from_ltrb(mx, my, width as f32 - mx, height as f32 - my)
}

/// Draw `surface` into a `width × height` image using its current limits.
pub fn render_surface(
    surface: &RenderSurface,
    width: u32,
    height: u32,
) -> Result<RgbaImage, ExportError> {
    let empty = || ExportError::EmptyCanvas { width, height };
    let mut pixmap = Pixmap::new(width, height).ok_or_else(empty)?;
    pixmap.fill(Color::WHITE);

    let area = plot_area(width, height).ok_or_else(empty)?;
    let (x, y) = surface.view_bounds();
    let vp = Viewport { x, y, area };

    let frame = PathBuilder::from_rect(area);
    pixmap.stroke_path(
        &frame,
        &paint_for(Rgb::BLACK),
        &Stroke::default(),
        Transform::identity(),
        None,
    );
    // Keep drawables inside the frame.
    let mut clip = tiny_skia::Mask::new(width, height).ok_or_else(empty)?;
    clip.fill_path(&frame, tiny_skia::FillRule::Winding, false, Transform::identity());

    for line in &surface.lines {
        let mut pb = PathBuilder::new();
        for (i, p) in line.points.iter().enumerate() {
            let (px, py) = vp.map(p[0], p[1]);
            if i == 0 {
                pb.move_to(px, py);
            } else {
                pb.line_to(px, py);
            }
        }
        if let Some(path) = pb.finish() {
            pixmap.stroke_path(
                &path,
                &paint_for(line.color),
                &stroke_for(line.width, line.kind),
                Transform::identity(),
                Some(&clip),
            );
        }
    }

    for row in &surface.event_rows {
        let mut pb = PathBuilder::new();
        let y = row.row as f64;
        for &t in row.times.iter().filter(|t| **t >= 0.0) {
            let (x0, y0) = vp.map(t, y - TICK_HALF_HEIGHT);
            let (x1, y1) = vp.map(t, y + TICK_HALF_HEIGHT);
            pb.move_to(x0, y0);
            pb.line_to(x1, y1);
        }
        if let Some(path) = pb.finish() {
            pixmap.stroke_path(
                &path,
                &paint_for(row.color),
                &stroke_for(1.5, LineKind::Solid),
                Transform::identity(),
                Some(&clip),
            );
        }
    }

    RgbaImage::from_raw(width, height, pixmap.take()).ok_or_else(empty)
}

fn svg_color(color: Rgb) -> String {
    let c = color.to_color32();
    format!("rgb({},{},{})", c.r(), c.g(), c.b())
}

fn svg_dash(width: f32, kind: LineKind) -> String {
    match kind {
        LineKind::Solid => String::new(),
        LineKind::Dashed => format!(r#" stroke-dasharray="{} {}""#, 6.0 * width, 4.0 * width),
        LineKind::Dotted => format!(r#" stroke-dasharray="{} {}""#, width, 2.0 * width),
    }
}

/// Describe `surface` as a `width × height` SVG document with the same
/// layout as [`render_surface`].
pub fn surface_svg(
    surface: &RenderSurface,
    width: u32,
    height: u32,
) -> Result<String, ExportError> {
    let area = plot_area(width, height).ok_or(ExportError::EmptyCanvas { width, height })?;
    let (x, y) = surface.view_bounds();
    let vp = Viewport { x, y, area };
    let frame = format!(
        r#"x="{}" y="{}" width="{}" height="{}""#,
        area.left(),
        area.top(),
        area.width(),
        area.height()
    );

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    svg.push_str(&format!(
        r#"<defs><clipPath id="area"><rect {frame}/></clipPath></defs>"#
    ));
    svg.push_str(r#"<rect width="100%" height="100%" fill="white"/>"#);
    svg.push_str(&format!(
        r#"<rect {frame} fill="none" stroke="black" stroke-width="1"/>"#
    ));
    svg.push_str(r#"<g clip-path="url(#area)">"#);

    for line in &surface.lines {
        let points: Vec<String> = line
            .points
            .iter()
            .filter(|p| p[0].is_finite() && p[1].is_finite())
            .map(|p| {
                let (px, py) = vp.map(p[0], p[1]);
                format!("{px},{py}")
            })
            .collect();
        if points.is_empty() {
            continue;
        }
        svg.push_str(&format!(
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{}"{}/>"#,
            points.join(" "),
            svg_color(line.color),
            line.width,
            svg_dash(line.width, line.kind)
        ));
    }

    for row in &surface.event_rows {
        let y = row.row as f64;
        let d: Vec<String> = row
            .times
            .iter()
            .filter(|t| **t >= 0.0 && t.is_finite())
            .map(|&t| {
                let (x0, y0) = vp.map(t, y - TICK_HALF_HEIGHT);
                let (x1, y1) = vp.map(t, y + TICK_HALF_HEIGHT);
                format!("M{x0} {y0}L{x1} {y1}")
            })
            .collect();
        if d.is_empty() {
            continue;
        }
        svg.push_str(&format!(
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="1.5"/>"#,
            d.concat(),
            svg_color(row.color)
        ));
    }

    svg.push_str("</g></svg>");
    Ok(svg)
}

/// Convert `surface` into a single-page PDF document.
pub fn render_pdf(
    surface: &RenderSurface,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, ExportError> {
    let svg = surface_svg(surface, width, height)?;
    let tree = usvg::Tree::from_str(&svg, &usvg::Options::default())?;
    svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|e| ExportError::Pdf(e.to_string()))
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Render `surface` and write it to `path`. A `.pdf` extension writes a
/// vector PDF, anything else goes through `image` by extension.
pub fn save_surface(
    surface: &RenderSurface,
    path: &Path,
    size: (u32, u32),
) -> Result<(), ExportError> {
    if is_pdf(path) {
        std::fs::write(path, render_pdf(surface, size.0, size.1)?)?;
    } else {
        render_surface(surface, size.0, size.1)?.save(path)?;
    }
    log::info!("exported '{}' to {}", surface.title, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::surface::{EventRow, LineSeries};
    use crate::plots::PlotId;

    #[test]
    fn zero_sized_canvas_is_an_error() {
        let s = RenderSurface::new(PlotId(0));
        assert!(matches!(
            render_surface(&s, 0, 10),
            Err(ExportError::EmptyCanvas { width: 0, height: 10 })
        ));
    }

    #[test]
    fn blank_surface_renders_white_interior() {
        let s = RenderSurface::new(PlotId(0));
        let img = render_surface(&s, 200, 100).unwrap();
        assert_eq!(img.dimensions(), (200, 100));
        assert_eq!(img.get_pixel(100, 50).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(2, 2).0, [255, 255, 255, 255]);
    }

    #[test]
    fn svg_has_one_polyline_per_line_and_skips_sentinels() {
        let mut s = RenderSurface::new(PlotId(0));
        s.set_x_limits(0.0, 1.0);
        s.set_y_limits(0.0, 1.0);
        s.lines.push(LineSeries {
            name: "a".into(),
            points: vec![[0.0, 0.0], [1.0, 1.0]],
            color: Rgb::new(1.0, 0.0, 0.0),
            width: 1.0,
            kind: LineKind::Dashed,
        });
        s.event_rows.push(EventRow {
            row: 0,
            times: vec![-1.0],
            color: Rgb::BLACK,
        });
        let svg = surface_svg(&s, 200, 100).unwrap();
        assert_eq!(svg.matches("<polyline").count(), 1);
        assert!(svg.contains("stroke-dasharray"));
        assert!(svg.contains("rgb(255,0,0)"));
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn pdf_output_has_pdf_header() {
        let s = RenderSurface::new(PlotId(0));
        let pdf = render_pdf(&s, 320, 240).unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
    }
}
