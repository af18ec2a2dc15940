//! The visualizer application.
//!
//! | Sub-module  | Responsibility |
//! | ----------- | -------------- |
//! | [`update`]  | Per-frame ingestion, request handling, and plot-grid rendering |
//! | [`menu_ui`] | Top menu bar: export, plot visibility, adding plots |
//! | [`run`]     | [`run_visualizer()`] entry point |
//!
//! Data flows one way: the simulator thread sends [`ProbeBatch`]es, the app
//! buffers them per stream and hands each subscribed plot the latest window.
//! Plots talk back only through [`PlotRequest`]s, which the app drains once
//! per frame.

mod menu_ui;
mod run;
mod update;

pub use run::{run_app, run_visualizer};

use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender};

use indexmap::IndexMap;

use crate::config::VisualizerConfig;
use crate::data::buffer::StreamBuffer;
use crate::data::target::Probe;
use crate::error::PlotError;
use crate::export::{self, ExportError};
use crate::observer::{ObserverHub, StreamKey};
use crate::panels::customize_ui::CustomizeWindow;
use crate::plots::{registry, Plot, PlotContext, PlotId, PlotRequest};
use crate::sink::ProbeBatch;

/// Picks where an exported plot goes, given a suggested file name.
pub type ExportPathChooser = Box<dyn FnMut(&str) -> Option<PathBuf>>;

fn choose_with_dialog(suggested: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_file_name(suggested)
        .add_filter("PDF", &["pdf"])
        .add_filter("PNG", &["png"])
        .add_filter("JPEG", &["jpg", "jpeg"])
        .add_filter("BMP", &["bmp"])
        .save_file()
}

/// File name for an exported plot titled `title`.
pub fn export_file_name(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let stem = stem.trim_matches('_');
    if stem.is_empty() {
        "plot.png".to_string()
    } else {
        format!("{stem}.png")
    }
}

pub(crate) struct PlotEntry {
    plot: Box<dyn Plot>,
    visible: bool,
}

pub struct VisualizerApp {
    cfg: VisualizerConfig,
    probes_rx: Receiver<ProbeBatch>,
    requests_tx: Sender<PlotRequest>,
    requests_rx: Receiver<PlotRequest>,
    probes: Vec<Probe>,
    buffers: IndexMap<StreamKey, StreamBuffer>,
    plots: IndexMap<PlotId, PlotEntry>,
    hub: ObserverHub,
    customize: Vec<CustomizeWindow>,
    choose_export_path: ExportPathChooser,
}

impl VisualizerApp {
    /// Create the app for the given probes. Registers the built-in plot types
    /// if that has not happened yet.
    pub fn new(cfg: VisualizerConfig, probes_rx: Receiver<ProbeBatch>, probes: Vec<Probe>) -> Self {
        if registry::read().is_empty() {
            if let Err(e) = registry::register_builtin() {
                log::error!("failed to register built-in plots: {e}");
            }
        }
        let (requests_tx, requests_rx) = std::sync::mpsc::channel();
        Self {
            cfg,
            probes_rx,
            requests_tx,
            requests_rx,
            probes,
            buffers: IndexMap::new(),
            plots: IndexMap::new(),
            hub: ObserverHub::new(),
            customize: Vec::new(),
            choose_export_path: Box::new(choose_with_dialog),
        }
    }

    /// Replace the file dialog used by plot exports.
    pub fn with_export_path_chooser(
        mut self,
        chooser: impl FnMut(&str) -> Option<PathBuf> + 'static,
    ) -> Self {
        self.choose_export_path = Box::new(chooser);
        self
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.cfg
    }

    pub fn probes(&self) -> &[Probe] {
        &self.probes
    }

    pub fn hub(&self) -> &ObserverHub {
        &self.hub
    }

    pub fn plot_ids(&self) -> Vec<PlotId> {
        self.plots.keys().copied().collect()
    }

    pub fn plot(&self, id: PlotId) -> Option<&dyn Plot> {
        self.plots.get(&id).map(|e| e.plot.as_ref())
    }

    pub fn plot_mut(&mut self, id: PlotId) -> Option<&mut dyn Plot> {
        self.plots.get_mut(&id).map(|e| e.plot.as_mut())
    }

    pub fn is_visible(&self, id: PlotId) -> bool {
        self.plots.get(&id).is_some_and(|e| e.visible)
    }

    pub fn set_visible(&mut self, id: PlotId, visible: bool) {
        if let Some(e) = self.plots.get_mut(&id) {
            e.visible = visible;
        }
    }

    pub fn customize_window(&self, id: PlotId) -> Option<&CustomizeWindow> {
        self.customize.iter().find(|w| w.plot_id() == id)
    }

    /// Create a `type_name` plot for `capability` on `target` and subscribe it
    /// to that stream. Data already buffered is shown right away.
    pub fn add_plot(
        &mut self,
        type_name: &str,
        target: &str,
        capability: &str,
    ) -> Result<PlotId, PlotError> {
        let probe = self
            .probes
            .iter()
            .find(|p| p.target.label() == target && p.capability.name() == capability)
            .cloned()
            .ok_or_else(|| PlotError::UnknownStream {
                target: target.to_string(),
                capability: capability.to_string(),
            })?;

        let plot = {
            let reg = registry::read();
            let desc = reg
                .get(type_name)
                .ok_or_else(|| PlotError::UnknownPlotType(type_name.to_string()))?;
            if !(desc.supports)(probe.capability.as_ref()) {
                return Err(PlotError::UnsupportedCapability {
                    plot_type: type_name.to_string(),
                    capability: capability.to_string(),
                });
            }
            let ctx = PlotContext::new(
                probe.target.clone(),
                probe.capability.clone(),
                self.requests_tx.clone(),
            );
            (desc.create)(ctx)
        };

        let id = plot.id();
        log::info!("adding {} for {}/{}", plot.name(), target, capability);
        self.plots.insert(id, PlotEntry { plot, visible: true });
        self.hub.subscribe(target, capability, id);

        let key = (target.to_string(), capability.to_string());
        if let Some(buf) = self.buffers.get(&key).filter(|b| !b.is_empty()) {
            let (start, window) = buf.window(self.cfg.max_window_size);
            let step = buf.step_size();
            if let Some(e) = self.plots.get_mut(&id) {
                e.plot.update(start, step, &window);
            }
        }
        Ok(id)
    }

    /// Unsubscribe and drop a plot along with its customize window. Returns
    /// whether the plot existed.
    pub fn remove_plot_for(&mut self, id: PlotId) -> bool {
        self.hub.unsubscribe_all(id);
        self.customize.retain(|w| w.plot_id() != id);
        match self.plots.shift_remove(&id) {
            Some(e) => {
                log::info!("removed {} #{}", e.plot.name(), id.0);
                true
            }
            None => false,
        }
    }

    /// Buffer one batch and update every plot subscribed to its stream.
    pub fn dispatch(&mut self, batch: ProbeBatch) {
        let key = (batch.target, batch.capability);
        let capacity = self.cfg.max_buffer_elements;
        let buf = self
            .buffers
            .entry(key.clone())
            .or_insert_with(|| StreamBuffer::new(capacity));
        buf.push(batch.start_step, batch.step_size, &batch.data);

        let subscribers = self.hub.subscribers(&key.0, &key.1);
        if subscribers.is_empty() {
            return;
        }
        let (start, window) = buf.window(self.cfg.max_window_size);
        let step = buf.step_size();
        for id in subscribers {
            if let Some(e) = self.plots.get_mut(id) {
                e.plot.update(start, step, &window);
                e.plot.surface_mut().queue_draw();
            }
        }
    }

    /// Drain the probe channel. Returns the number of batches handled.
    pub fn drain_probes(&mut self) -> usize {
        let batches: Vec<ProbeBatch> = self.probes_rx.try_iter().collect();
        let n = batches.len();
        for b in batches {
            self.dispatch(b);
        }
        n
    }

    /// Act on every pending plot request.
    pub fn drain_requests(&mut self) {
        let requests: Vec<PlotRequest> = self.requests_rx.try_iter().collect();
        for req in requests {
            self.handle_request(req);
        }
    }

    fn handle_request(&mut self, req: PlotRequest) {
        match req {
            PlotRequest::Remove {
                plot,
                target,
                capability,
            } => {
                self.hub.unsubscribe(&target, &capability, plot);
                self.remove_plot_for(plot);
            }
            PlotRequest::Export { plot, title } => {
                let suggested = format!(
                    "{}_{}",
                    chrono::Local::now().timestamp_millis(),
                    export_file_name(&title)
                );
                let Some(path) = (self.choose_export_path)(&suggested) else {
                    return;
                };
                if let Err(e) = self.export_plot(plot, &path) {
                    log::error!("failed to export '{}': {}", title, e);
                }
            }
            PlotRequest::Customize { plot } => self.open_customize(plot),
        }
    }

    /// Open the customize window for `id`, unless one is open already.
    pub fn open_customize(&mut self, id: PlotId) {
        if self.customize_window(id).is_some() {
            return;
        }
        let Some(e) = self.plots.get(&id) else {
            return;
        };
        let title = e.plot.title();
        match CustomizeWindow::new(e.plot.as_ref(), Some(&title)) {
            Ok(w) => self.customize.push(w),
            Err(err) => log::error!("cannot customize '{}': {}", title, err),
        }
    }

    pub fn export_plot(&self, id: PlotId, path: &Path) -> Result<(), ExportError> {
        match self.plots.get(&id) {
            Some(e) => export::save_surface(e.plot.surface(), path, self.cfg.export_size),
            None => Ok(()),
        }
    }

    /// Export every plot into `dir`, one file per plot.
    pub fn export_all(&self, dir: &Path) -> Vec<(PathBuf, ExportError)> {
        let mut failures = Vec::new();
        for e in self.plots.values() {
            let name = format!("{}-{}", e.plot.id().0, export_file_name(&e.plot.title()));
            let path = dir.join(name);
            if let Err(err) = export::save_surface(e.plot.surface(), &path, self.cfg.export_size) {
                log::error!("failed to export {}: {}", path.display(), err);
                failures.push((path, err));
            }
        }
        failures
    }
}
