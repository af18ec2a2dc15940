//! Neuroscope crate root: re-exports and module wiring.
//!
//! Live plots for neural simulators, built on egui/eframe:
//! - `data`: option model, title templates, samples, and render surfaces
//! - `plots`: the plot contract, the plot-type registry, and the built-in plots
//! - `panels`: the customize form, colour dialog, and plot rendering
//! - `sink` / `observer`: feeding probe data to subscribed plots
//! - `app`: the eframe application and its run helpers
//! - `config`, `export`, `error`: ambient pieces

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod observer;
pub mod panels;
pub mod plots;
pub mod sink;

// Public re-exports for a compact external API
pub use app::{run_app, run_visualizer, VisualizerApp};
pub use config::{ConfigError, VisualizerConfig};
pub use data::options::{ConfigOption, OptionType, OptionValue, PlotOptions, Rgb};
pub use data::samples::SampleBlock;
pub use data::target::{Capability, NamedTarget, Probe, ProbeCapability, Target};
pub use error::PlotError;
pub use plots::{
    registry, BasePlot, Plot, PlotContext, PlotId, PlotRequest, PlotType, RasterSpikePlot,
    TimeSeriesPlot,
};
pub use sink::{channel, ProbeBatch, ProbeSink};
