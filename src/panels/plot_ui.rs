//! On-screen rendering of a plot's surface with egui_plot.

use egui::Ui;
use egui_phosphor::regular as icons;
use egui_plot::{Legend, Line, Plot as EguiPlot};

use crate::data::surface::RenderSurface;
use crate::plots::plot_trait::Plot;

/// Half the height of a raster tick, in row units.
const TICK_HALF_HEIGHT: f64 = 0.4;

/// Draw `surface` into `ui` at `size` (including the title line).
pub fn show_surface(ui: &mut Ui, surface: &RenderSurface, size: egui::Vec2) -> egui::Response {
    let ((x0, x1), (y0, y1)) = surface.view_bounds();
    // egui_plot has no inverted axes; flip y in data space and in the tick labels instead.
    let sy = if y0 > y1 { -1.0 } else { 1.0 };
    let (ya, yb) = (y0 * sy, y1 * sy);

    ui.vertical(|ui| {
        ui.set_width(size.x);
        ui.vertical_centered(|ui| ui.strong(surface.title.as_str()));
        let mut plot = EguiPlot::new(surface.id())
            .width(size.x)
            .height((size.y - 24.0).max(40.0))
            .allow_scroll(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_boxed_zoom(false)
            .x_axis_label(surface.x_label.clone())
            .y_axis_label(surface.y_label.clone())
            .y_axis_formatter(move |mark, _range| {
                let v = mark.value * sy;
                if v.fract().abs() < 1e-9 {
                    format!("{v:.0}")
                } else {
                    format!("{v:.3}")
                }
            });
        if surface.show_legend {
            plot = plot.legend(Legend::default());
        }
        plot.show(ui, |plot_ui| {
            for l in &surface.lines {
                let pts: Vec<[f64; 2]> = l.points.iter().map(|p| [p[0], p[1] * sy]).collect();
                plot_ui.line(
                    Line::new(l.name.clone(), pts)
                        .color(l.color.to_color32())
                        .width(l.width)
                        .style(l.kind.to_egui()),
                );
            }
            for row in &surface.event_rows {
                let y = row.row as f64 * sy;
                let color = row.color.to_color32();
                for &t in row.times.iter().filter(|t| **t >= x0.min(x1) && **t <= x0.max(x1)) {
                    plot_ui.line(
                        Line::new("", vec![[t, y - TICK_HALF_HEIGHT], [t, y + TICK_HALF_HEIGHT]])
                            .color(color)
                            .width(1.5),
                    );
                }
            }
            plot_ui.set_plot_bounds_x(x0.min(x1)..=x0.max(x1));
            plot_ui.set_plot_bounds_y(ya.min(yb)..=ya.max(yb));
        })
        .response
    })
    .inner
}

/// Right-click menu offering the per-plot actions.
pub fn plot_context_menu(response: &egui::Response, plot: &dyn Plot) {
    response.context_menu(|ui| {
        if ui.button(format!("{} Customize", icons::SLIDERS)).clicked() {
            plot.request_customize();
            ui.close();
        }
        if ui.button(format!("{} Export", icons::EXPORT)).clicked() {
            plot.on_export();
            ui.close();
        }
        ui.separator();
        if ui.button(format!("{} Remove", icons::TRASH)).clicked() {
            plot.remove_plot();
            ui.close();
        }
    });
}
