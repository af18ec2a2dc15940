//! Render surface owned by each plot.
//!
//! A [`RenderSurface`] retains everything needed to draw a plot (axes, limits
//! and drawable primitives) independently of the UI toolkit. The egui view in
//! [`crate::panels::plot_ui`] and the file exporter in [`crate::export`] both
//! read from it.

use eframe::egui;

use crate::data::options::Rgb;
use crate::plots::plot_trait::PlotId;

/// Stroke pattern of a line series.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum LineKind {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl LineKind {
    pub const ALL: [LineKind; 3] = [LineKind::Solid, LineKind::Dashed, LineKind::Dotted];

    pub fn label(&self) -> &'static str {
        match self {
            LineKind::Solid => "Solid",
            LineKind::Dashed => "Dashed",
            LineKind::Dotted => "Dotted",
        }
    }

    pub fn from_label(s: &str) -> Option<LineKind> {
        LineKind::ALL.into_iter().find(|k| k.label() == s)
    }

    pub fn to_egui(self) -> egui_plot::LineStyle {
        match self {
            LineKind::Solid => egui_plot::LineStyle::Solid,
            LineKind::Dashed => egui_plot::LineStyle::Dashed { length: 6.0 },
            LineKind::Dotted => egui_plot::LineStyle::Dotted { spacing: 4.0 },
        }
    }
}

/// A polyline in plot coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
    pub color: Rgb,
    pub width: f32,
    pub kind: LineKind,
}

/// One raster row: a vertical tick at each event time.
#[derive(Clone, Debug, PartialEq)]
pub struct EventRow {
    pub row: usize,
    pub times: Vec<f64>,
    pub color: Rgb,
}

/// Colour cycle used when a plot draws several dimensions.
pub fn palette_color(index: usize) -> Rgb {
    const PALETTE: [(u8, u8, u8); 10] = [
        (31, 119, 180),
        (255, 127, 14),
        (44, 160, 44),
        (214, 39, 40),
        (148, 103, 189),
        (140, 86, 75),
        (227, 119, 194),
        (127, 127, 127),
        (188, 189, 34),
        (23, 190, 207),
    ];
    let (r, g, b) = PALETTE[index % PALETTE.len()];
    Rgb::from_color32(egui::Color32::from_rgb(r, g, b))
}

#[derive(Debug)]
pub struct RenderSurface {
    id: egui::Id,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Fixed x range; `None` fits to data.
    pub x_limits: Option<(f64, f64)>,
    /// Fixed y range; ignored while `autoscale_y` is set. A range with
    /// `lo > hi` draws the axis inverted.
    pub y_limits: Option<(f64, f64)>,
    pub autoscale_y: bool,
    pub show_legend: bool,
    pub lines: Vec<LineSeries>,
    pub event_rows: Vec<EventRow>,
    redraw_pending: bool,
    redraw_requests: u64,
}

impl RenderSurface {
    pub fn new(plot: PlotId) -> Self {
        Self {
            id: egui::Id::new(("neuroscope_surface", plot.0)),
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            x_limits: None,
            y_limits: None,
            autoscale_y: false,
            show_legend: false,
            lines: Vec::new(),
            event_rows: Vec::new(),
            redraw_pending: false,
            redraw_requests: 0,
        }
    }

    pub fn id(&self) -> egui::Id {
        self.id
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_x_limits(&mut self, lo: f64, hi: f64) {
        self.x_limits = Some((lo, hi));
    }

    pub fn set_y_limits(&mut self, lo: f64, hi: f64) {
        self.y_limits = Some((lo, hi));
    }

    /// Ask the host to redraw this surface on its next frame.
    pub fn queue_draw(&mut self) {
        self.redraw_pending = true;
        self.redraw_requests += 1;
    }

    pub fn redraw_pending(&self) -> bool {
        self.redraw_pending
    }

    /// Consume a pending redraw request.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw_pending)
    }

    /// Total number of redraws ever requested.
    pub fn redraw_requests(&self) -> u64 {
        self.redraw_requests
    }

    /// Data extent over lines and (non-sentinel) events:
    /// `((x_min, x_max), (y_min, y_max))`.
    pub fn data_bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let mut xs = (f64::INFINITY, f64::NEG_INFINITY);
        let mut ys = (f64::INFINITY, f64::NEG_INFINITY);
        let mut grow = |x: f64, y: f64| {
            if x.is_finite() && y.is_finite() {
                xs = (xs.0.min(x), xs.1.max(x));
                ys = (ys.0.min(y), ys.1.max(y));
            }
        };
        for l in &self.lines {
            for p in &l.points {
                grow(p[0], p[1]);
            }
        }
        for r in &self.event_rows {
            for &t in r.times.iter().filter(|t| **t >= 0.0) {
                grow(t, r.row as f64);
            }
        }
        (xs.0 <= xs.1).then_some((xs, ys))
    }

    /// The x and y ranges the surface should currently display.
    pub fn view_bounds(&self) -> ((f64, f64), (f64, f64)) {
        let data = self.data_bounds();
        let x = self
            .x_limits
            .or(data.map(|d| d.0))
            .unwrap_or((0.0, 1.0));
        let y = if self.autoscale_y {
            data.map(|d| pad_range(d.1)).or(self.y_limits)
        } else {
            self.y_limits.or(data.map(|d| pad_range(d.1)))
        }
        .unwrap_or((0.0, 1.0));
        (x, y)
    }
}

fn pad_range((lo, hi): (f64, f64)) -> (f64, f64) {
    let span = hi - lo;
    if span.abs() < f64::EPSILON {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo - 0.05 * span, hi + 0.05 * span)
    }
}

impl Drop for RenderSurface {
    fn drop(&mut self) {
        log::debug!("render surface '{}' destroyed", self.title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_draw_is_consumed_once() {
        let mut s = RenderSurface::new(PlotId(7));
        assert!(!s.take_redraw());
        s.queue_draw();
        s.queue_draw();
        assert!(s.take_redraw());
        assert!(!s.take_redraw());
        assert_eq!(s.redraw_requests(), 2);
    }

    #[test]
    fn sentinel_events_do_not_widen_bounds() {
        let mut s = RenderSurface::new(PlotId(1));
        s.event_rows.push(EventRow {
            row: 0,
            times: vec![-1.0],
            color: Rgb::BLACK,
        });
        assert_eq!(s.data_bounds(), None);
        s.event_rows.push(EventRow {
            row: 1,
            times: vec![0.25, 0.5],
            color: Rgb::BLACK,
        });
        assert_eq!(s.data_bounds(), Some(((0.25, 0.5), (1.0, 1.0))));
    }

    #[test]
    fn fixed_limits_win_unless_autoscaling() {
        let mut s = RenderSurface::new(PlotId(2));
        s.set_y_limits(-1.0, 1.0);
        s.lines.push(LineSeries {
            name: "a".into(),
            points: vec![[0.0, 0.0], [1.0, 10.0]],
            color: Rgb::BLACK,
            width: 1.0,
            kind: LineKind::Solid,
        });
        assert_eq!(s.view_bounds().1, (-1.0, 1.0));
        s.autoscale_y = true;
        assert_eq!(s.view_bounds().1, (-0.5, 10.5));
        assert_eq!(LineKind::from_label("Dotted"), Some(LineKind::Dotted));
    }
}
