//! Entry points for running the visualizer in a native window.

use std::sync::mpsc::Receiver;

use eframe::egui;

use crate::config::VisualizerConfig;
use crate::data::target::Probe;
use crate::sink::ProbeBatch;

use super::VisualizerApp;

/// Build a [`VisualizerApp`] for `probes` and run it. Blocks until the window
/// is closed.
pub fn run_visualizer(
    cfg: VisualizerConfig,
    rx: Receiver<ProbeBatch>,
    probes: Vec<Probe>,
) -> eframe::Result<()> {
    run_app(VisualizerApp::new(cfg, rx, probes))
}

/// Run an already set up app, e.g. one with plots added.
pub fn run_app(mut app: VisualizerApp) -> eframe::Result<()> {
    let title = app.cfg.title.clone();
    let mut opts = app
        .cfg
        .native_options
        .take()
        .unwrap_or_else(eframe::NativeOptions::default);

    if opts.viewport.inner_size.is_none() {
        let plot = app.cfg.plot_size();
        let columns = app.cfg.columns.max(1) as f32;
        let (mw, mh) = app.cfg.min_plot_size;
        opts.viewport = opts
            .viewport
            .clone()
            .with_inner_size(egui::vec2(
                (plot.x + 24.0) * columns + 16.0,
                (plot.y + 24.0) * 2.0 + 40.0,
            ))
            .with_min_inner_size(egui::vec2(mw + 40.0, mh + 80.0));
    }

    eframe::run_native(
        &title,
        opts,
        Box::new(|cc| {
            // Install Phosphor icon font before creating the app.
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(app))
        }),
    )
}
