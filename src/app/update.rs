//! Per-frame update of [`VisualizerApp`].

use std::time::Duration;

use eframe::egui;

use crate::panels::plot_ui::{plot_context_menu, show_surface};

use super::VisualizerApp;

/// How often to poll the probe channel while idle.
const POLL_INTERVAL: Duration = Duration::from_millis(30);

impl VisualizerApp {
    fn render_plot_grid(&mut self, ui: &mut egui::Ui) {
        if self.plots.values().all(|e| !e.visible) {
            ui.centered_and_justified(|ui| {
                ui.weak("No plots. Add one from the Plots menu.");
            });
            return;
        }
        let size = self.cfg.plot_size();
        let columns = self.cfg.columns.max(1);
        egui::ScrollArea::both().show(ui, |ui| {
            egui::Grid::new("plot_grid")
                .spacing([12.0, 12.0])
                .show(ui, |ui| {
                    let mut col = 0;
                    for e in self.plots.values_mut().filter(|e| e.visible) {
                        let response = ui
                            .group(|ui| show_surface(ui, e.plot.surface(), size))
                            .inner;
                        plot_context_menu(&response, e.plot.as_ref());
                        // Redraw requests are satisfied by this frame.
                        e.plot.surface_mut().take_redraw();
                        col += 1;
                        if col == columns {
                            ui.end_row();
                            col = 0;
                        }
                    }
                });
        });
    }

    fn render_customize_windows(&mut self, ctx: &egui::Context) {
        let plots = &mut self.plots;
        self.customize
            .retain_mut(|w| match plots.get_mut(&w.plot_id()) {
                Some(e) => w.show(ctx, e.plot.as_mut()),
                None => false,
            });
    }
}

impl eframe::App for VisualizerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_probes();
        self.drain_requests();

        self.render_menu_bar(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_plot_grid(ui);
        });
        self.render_customize_windows(ctx);

        // Customize edits land after the grid was drawn.
        let pending_redraw = self.plots.values().any(|e| e.plot.surface().redraw_pending());
        if pending_redraw {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(POLL_INTERVAL);
        }
    }
}
