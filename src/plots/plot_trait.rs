//! The plot contract shared by every concrete plot.
//!
//! A plot is split in two halves:
//!
//! | Trait        | Side     | Purpose |
//! | ------------ | -------- | ------- |
//! | [`Plot`]     | instance | data ingestion, title, dimensions, options, host requests |
//! | [`PlotType`] | static   | registry key, display name, capability filter, construction |
//!
//! Shared state and behaviour lives in [`BasePlot`], which every concrete plot
//! embeds and exposes through [`Plot::base`].

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;

use downcast_rs::{impl_downcast, Downcast};

use crate::data::options::{ConfigOption, PlotOptions};
use crate::data::samples::SampleBlock;
use crate::data::surface::RenderSurface;
use crate::data::target::{Capability, Target};
use crate::data::template;
use crate::plots::effects;

/// Default title template; `TARGET` and `DATA` are always defined.
pub const DEFAULT_TITLE: &str = "{TARGET} - {DATA}";

static PLOT_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Process-unique plot identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlotId(pub u64);

impl PlotId {
    pub fn next() -> Self {
        PlotId(PLOT_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Requests a plot sends to its host.
#[derive(Clone, Debug, PartialEq)]
pub enum PlotRequest {
    /// Detach the observer for `(target, capability)` and drop the plot.
    Remove {
        plot: PlotId,
        target: String,
        capability: String,
    },
    /// Export the plot's surface to a file.
    Export { plot: PlotId, title: String },
    /// Open the customize window for the plot.
    Customize { plot: PlotId },
}

/// Everything a host hands to a plot constructor.
#[derive(Clone)]
pub struct PlotContext {
    pub target: Rc<dyn Target>,
    pub capability: Rc<dyn Capability>,
    pub requests: Sender<PlotRequest>,
}

impl PlotContext {
    pub fn new(
        target: Rc<dyn Target>,
        capability: Rc<dyn Capability>,
        requests: Sender<PlotRequest>,
    ) -> Self {
        Self {
            target,
            capability,
            requests,
        }
    }
}

/// State common to all plots.
pub struct BasePlot {
    id: PlotId,
    plot_name: &'static str,
    target: Rc<dyn Target>,
    capability: Rc<dyn Capability>,
    options: PlotOptions,
    surface: RenderSurface,
    requests: Sender<PlotRequest>,
}

impl BasePlot {
    /// Create the render surface and default options, and title the surface.
    pub fn new(ctx: PlotContext, plot_name: &'static str) -> Self {
        let id = PlotId::next();
        let mut base = Self {
            id,
            plot_name,
            target: ctx.target,
            capability: ctx.capability,
            options: PlotOptions::new(),
            surface: RenderSurface::new(id),
            requests: ctx.requests,
        };
        base.init_default_config();
        base.refresh_title();
        log::debug!("created {} #{} for '{}'", plot_name, id.0, base.target.label());
        base
    }

    /// Set the options every plot carries: an editable `title` template plus
    /// the read-only `TARGET` and `DATA` labels it may reference.
    pub fn init_default_config(&mut self) {
        self.options.insert(
            ConfigOption::text("title", "Title", DEFAULT_TITLE).with_on_change(effects::set_title),
        );
        self.options
            .insert(ConfigOption::fixed("TARGET", self.target.label()));
        self.options
            .insert(ConfigOption::fixed("DATA", self.capability.name()));
    }

    pub fn id(&self) -> PlotId {
        self.id
    }

    pub fn plot_name(&self) -> &'static str {
        self.plot_name
    }

    pub fn target(&self) -> &Rc<dyn Target> {
        &self.target
    }

    pub fn capability(&self) -> &Rc<dyn Capability> {
        &self.capability
    }

    pub fn options(&self) -> &PlotOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut PlotOptions {
        &mut self.options
    }

    pub fn surface(&self) -> &RenderSurface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut RenderSurface {
        &mut self.surface
    }

    /// The `title` template expanded with the current option values. Falls
    /// back to the raw template if it cannot be expanded, and to the plot
    /// name if there is no `title` option.
    pub fn title(&self) -> String {
        match self.options.text("title") {
            Some(t) => template::render_or_raw(t, &self.options),
            None => self.plot_name.to_string(),
        }
    }

    pub fn refresh_title(&mut self) {
        let t = self.title();
        self.surface.set_title(t);
    }

    /// Always recomputed from the live target and capability.
    pub fn dimensions(&self) -> usize {
        self.capability.out_dimensions(self.target.as_ref())
    }

    fn send(&self, req: PlotRequest) {
        if let Err(e) = self.requests.send(req) {
            log::warn!("plot #{}: host is gone, dropping {:?}", self.id.0, e.0);
        }
    }

    pub fn remove_plot(&self) {
        self.send(PlotRequest::Remove {
            plot: self.id,
            target: self.target.label(),
            capability: self.capability.name(),
        });
    }

    pub fn on_export(&self) {
        self.send(PlotRequest::Export {
            plot: self.id,
            title: self.title(),
        });
    }

    pub fn request_customize(&self) {
        self.send(PlotRequest::Customize { plot: self.id });
    }
}

/// Instance side of a plot.
pub trait Plot: Downcast {
    fn base(&self) -> &BasePlot;
    fn base_mut(&mut self) -> &mut BasePlot;

    /// Ingest a batch of samples. `start_step` indexes the first row of
    /// `data`, `step_size` converts steps to simulated seconds, and `data` is
    /// shaped `(samples × dimensions)`. Rebuilds the drawables from these
    /// arguments alone, so repeating a call leaves the surface unchanged.
    fn update(&mut self, start_step: u64, step_size: f64, data: &SampleBlock);

    fn id(&self) -> PlotId {
        self.base().id()
    }

    fn name(&self) -> &'static str {
        self.base().plot_name()
    }

    fn title(&self) -> String {
        self.base().title()
    }

    fn dimensions(&self) -> usize {
        self.base().dimensions()
    }

    fn options(&self) -> &PlotOptions {
        self.base().options()
    }

    fn options_mut(&mut self) -> &mut PlotOptions {
        self.base_mut().options_mut()
    }

    fn surface(&self) -> &RenderSurface {
        self.base().surface()
    }

    fn surface_mut(&mut self) -> &mut RenderSurface {
        self.base_mut().surface_mut()
    }

    /// Ask the host to detach and drop this plot.
    fn remove_plot(&self) {
        self.base().remove_plot()
    }

    fn on_export(&self) {
        self.base().on_export()
    }

    fn request_customize(&self) {
        self.base().request_customize()
    }
}
impl_downcast!(Plot);

/// Static side of a plot type. Both `plot_name` and `supports_capability`
/// are required.
pub trait PlotType: Plot + Sized {
    /// Registry key.
    const TYPE_NAME: &'static str;

    /// Human-readable name used in menus.
    fn plot_name() -> &'static str;

    fn supports_capability(capability: &dyn Capability) -> bool;

    fn create(ctx: PlotContext) -> Self;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::options::OptionValue;
    use crate::data::target::{NamedTarget, ProbeCapability};
    use std::sync::mpsc;

    fn base(label: &str, cap: &str) -> (BasePlot, mpsc::Receiver<PlotRequest>) {
        let (tx, rx) = mpsc::channel();
        let ctx = PlotContext::new(
            Rc::new(NamedTarget::new(label)),
            Rc::new(ProbeCapability::new(cap, 3)),
            tx,
        );
        (BasePlot::new(ctx, "Test Plot"), rx)
    }

    #[test]
    fn default_config_and_title() {
        let (b, _rx) = base("Neuron1", "Voltages");
        assert_eq!(b.options().text("title"), Some(DEFAULT_TITLE));
        assert!(!b.options().get("TARGET").unwrap().configurable());
        assert!(!b.options().get("DATA").unwrap().configurable());
        assert_eq!(b.title(), "Neuron1 - Voltages");
        assert_eq!(b.surface().title, "Neuron1 - Voltages");
    }

    #[test]
    fn title_falls_back_to_raw_template() {
        let (mut b, _rx) = base("Neuron1", "Voltages");
        b.options_mut()
            .set_value("title", OptionValue::from("{UNKNOWN}"))
            .unwrap();
        assert_eq!(b.title(), "{UNKNOWN}");
    }

    #[test]
    fn remove_plot_notifies_host() {
        let (b, rx) = base("ens", "spikes");
        b.remove_plot();
        assert_eq!(
            rx.try_recv().unwrap(),
            PlotRequest::Remove {
                plot: b.id(),
                target: "ens".into(),
                capability: "spikes".into(),
            }
        );
    }

    #[test]
    fn ids_are_unique() {
        let (a, _ra) = base("a", "x");
        let (b, _rb) = base("b", "x");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.dimensions(), 3);
    }
}
