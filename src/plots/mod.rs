pub mod effects;
pub mod plot_trait;
pub mod raster_spike;
pub mod registry;
pub mod time_series;

pub use plot_trait::{BasePlot, Plot, PlotContext, PlotId, PlotRequest, PlotType};
pub use raster_spike::RasterSpikePlot;
pub use registry::{PlotDescriptor, PlotRegistry};
pub use time_series::TimeSeriesPlot;
