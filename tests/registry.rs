use std::rc::Rc;
use std::sync::mpsc;

use serial_test::serial;

use neuroscope::data::target::Capability;
use neuroscope::plots::registry::{self, PlotDescriptor};
use neuroscope::plots::{
    BasePlot, Plot, PlotContext, PlotType, RasterSpikePlot, TimeSeriesPlot,
};
use neuroscope::{NamedTarget, PlotError, ProbeCapability, SampleBlock};

struct HistogramPlot {
    base: BasePlot,
}

impl Plot for HistogramPlot {
    fn base(&self) -> &BasePlot {
        &self.base
    }
    fn base_mut(&mut self) -> &mut BasePlot {
        &mut self.base
    }
    fn update(&mut self, _: u64, _: f64, _: &SampleBlock) {}
}

impl PlotType for HistogramPlot {
    const TYPE_NAME: &'static str = "HistogramPlot";

    fn plot_name() -> &'static str {
        "Histogram"
    }

    fn supports_capability(capability: &dyn Capability) -> bool {
        capability.name() == "voltages"
    }

    fn create(ctx: PlotContext) -> Self {
        Self {
            base: BasePlot::new(ctx, Self::plot_name()),
        }
    }
}

fn ctx(capability: &str) -> PlotContext {
    let (tx, _rx) = mpsc::channel();
    PlotContext::new(
        Rc::new(NamedTarget::new("ens")),
        Rc::new(ProbeCapability::new(capability, 2)),
        tx,
    )
}

#[test]
#[serial]
fn builtin_types_are_listed_in_registration_order() {
    registry::reset();
    assert!(registry::all_registered().is_empty());
    registry::register_builtin().unwrap();
    let names: Vec<&str> = registry::all_registered().keys().copied().collect();
    assert_eq!(names, vec!["RasterSpikePlot", "TimeSeriesPlot"]);
    registry::reset();
}

#[test]
#[serial]
fn registering_twice_keeps_one_entry() {
    registry::reset();
    registry::register::<RasterSpikePlot>().unwrap();
    registry::register::<RasterSpikePlot>().unwrap();
    assert_eq!(registry::all_registered().len(), 1);
    registry::reset();
}

#[test]
#[serial]
fn third_party_type_is_created_and_downcast() {
    registry::reset();
    registry::register_builtin().unwrap();
    registry::register::<HistogramPlot>().unwrap();

    let voltages = ProbeCapability::new("voltages", 1);
    let names: Vec<&str> = registry::read()
        .supporting(&voltages)
        .iter()
        .map(|d| d.plot_name)
        .collect();
    assert_eq!(names, vec!["Time Series Plot", "Histogram"]);

    let plot = registry::read().create("HistogramPlot", ctx("voltages")).unwrap();
    assert_eq!(plot.name(), "Histogram");
    assert!(plot.downcast_ref::<HistogramPlot>().is_some());
    assert!(plot.downcast_ref::<TimeSeriesPlot>().is_none());
    registry::reset();
}

#[test]
#[serial]
fn unknown_type_is_an_error() {
    registry::reset();
    registry::register_builtin().unwrap();
    let err = registry::read().create("PolarPlot", ctx("spikes")).err().unwrap();
    assert_eq!(err, PlotError::UnknownPlotType("PolarPlot".into()));
    registry::reset();
}

#[test]
#[serial]
fn nameless_descriptor_is_not_registered() {
    registry::reset();
    let mut desc = PlotDescriptor::of::<HistogramPlot>();
    desc.type_name = "";
    let err = registry::write().register_descriptor(desc).err().unwrap();
    assert!(matches!(err, PlotError::NotImplemented { .. }));
    assert!(registry::all_registered().is_empty());
}
