//! Spike raster: one row per neuron, one tick per spike.

use crate::data::options::{ConfigOption, OptionValue, Rgb};
use crate::data::samples::{linspace, SampleBlock};
use crate::data::surface::{palette_color, EventRow};
use crate::data::target::Capability;
use crate::error::PlotError;
use crate::plots::effects;
use crate::plots::plot_trait::{BasePlot, Plot, PlotContext, PlotType};

/// Event time given to a row with no spikes, outside any plotted range.
pub const NO_SPIKE_SENTINEL: f64 = -1.0;

pub struct RasterSpikePlot {
    base: BasePlot,
}

impl RasterSpikePlot {
    fn row_color(&self, row: usize) -> Rgb {
        let opts = self.base.options();
        if opts.bool("color_cycle").unwrap_or(true) {
            palette_color(row)
        } else {
            opts.color("event_color").unwrap_or(Rgb::BLACK)
        }
    }

    /// Reapply row colours after a colour option changed.
    pub fn recolor(&mut self) {
        let colors: Vec<Rgb> = self
            .base
            .surface()
            .event_rows
            .iter()
            .map(|r| self.row_color(r.row))
            .collect();
        for (row, c) in self.base.surface_mut().event_rows.iter_mut().zip(colors) {
            row.color = c;
        }
    }

    /// Spike times per dimension; a silent dimension yields the sentinel.
    pub fn spike_times(start_step: u64, step_size: f64, data: &SampleBlock) -> Vec<Vec<f64>> {
        let (n, dims) = data.shape();
        let start_time = start_step as f64 * step_size;
        let end_time = (start_step + n as u64) as f64 * step_size;
        let t = linspace(start_time, end_time, n);
        (0..dims)
            .map(|d| {
                let times: Vec<f64> = data
                    .column(d)
                    .zip(t.iter())
                    .filter(|(v, _)| *v > 0.0)
                    .map(|(_, t)| *t)
                    .collect();
                if times.is_empty() {
                    vec![NO_SPIKE_SENTINEL]
                } else {
                    times
                }
            })
            .collect()
    }
}

fn apply_color(plot: &mut dyn Plot, name: &str, value: OptionValue) -> Result<(), PlotError> {
    effects::store(plot, name, value)?;
    if let Some(raster) = plot.downcast_mut::<RasterSpikePlot>() {
        raster.recolor();
    }
    Ok(())
}

impl PlotType for RasterSpikePlot {
    const TYPE_NAME: &'static str = "RasterSpikePlot";

    fn plot_name() -> &'static str {
        "Raster Spike Plot"
    }

    fn supports_capability(capability: &dyn Capability) -> bool {
        capability.name() == "spikes"
    }

    fn create(ctx: PlotContext) -> Self {
        let mut base = BasePlot::new(ctx, Self::plot_name());
        let opts = base.options_mut();
        opts.insert(
            ConfigOption::boolean("color_cycle", "Colour per neuron", true)
                .with_on_change(apply_color),
        );
        opts.insert(
            ConfigOption::color("event_color", "Spike colour", palette_color(0))
                .with_on_change(apply_color),
        );
        opts.insert(ConfigOption::text("x_label", "X label", "time").with_on_change(effects::set_axis_label));
        let surface = base.surface_mut();
        surface.x_label = "time".to_string();
        surface.y_label = "neuron".to_string();
        surface.set_x_limits(0.0, 1.0);
        surface.set_y_limits(0.0, 1.0);
        Self { base }
    }
}

impl Plot for RasterSpikePlot {
    fn base(&self) -> &BasePlot {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BasePlot {
        &mut self.base
    }

    fn update(&mut self, start_step: u64, step_size: f64, data: &SampleBlock) {
        let expected = self.base.dimensions();
        if data.dimensions() != expected {
            log::warn!(
                "{}: got {} dimensions, capability reports {}",
                self.base.title(),
                data.dimensions(),
                expected
            );
        }
        let rows: Vec<EventRow> = Self::spike_times(start_step, step_size, data)
            .into_iter()
            .enumerate()
            .map(|(row, times)| EventRow {
                row,
                times,
                color: self.row_color(row),
            })
            .collect();
        let n_rows = rows.len() as f64;
        let end_time = (start_step + data.samples() as u64) as f64 * step_size;

        let surface = self.base.surface_mut();
        surface.event_rows = rows;
        // Neuron 0 on top.
        surface.set_y_limits(n_rows - 0.5, -0.5);
        surface.set_x_limits(0.0, if end_time > 0.0 { end_time } else { 1.0 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::target::{NamedTarget, ProbeCapability};
    use std::rc::Rc;
    use std::sync::mpsc;

    fn plot(dims: usize) -> RasterSpikePlot {
        let (tx, _rx) = mpsc::channel();
        RasterSpikePlot::create(PlotContext::new(
            Rc::new(NamedTarget::new("ens")),
            Rc::new(ProbeCapability::new("spikes", dims)),
            tx,
        ))
    }

    #[test]
    fn silent_neuron_gets_sentinel() {
        let data = SampleBlock::from_rows(&[[0.0, 1.0], [0.0, 0.0], [0.0, 1.0]]).unwrap();
        let times = RasterSpikePlot::spike_times(0, 0.001, &data);
        assert_eq!(times[0], vec![NO_SPIKE_SENTINEL]);
        assert_eq!(times[1].len(), 2);
        assert!((times[1][0] - 0.0).abs() < 1e-12);
        assert!((times[1][1] - 0.003).abs() < 1e-12);
    }

    #[test]
    fn update_is_idempotent() {
        let mut p = plot(2);
        let data = SampleBlock::from_rows(&[[1.0, 0.0], [0.0, 1.0]]).unwrap();
        p.update(0, 0.001, &data);
        let first = p.surface().event_rows.clone();
        p.update(0, 0.001, &data);
        assert_eq!(p.surface().event_rows, first);
        assert_eq!(p.surface().y_limits, Some((1.5, -0.5)));
    }

    #[test]
    fn supports_only_spikes() {
        assert!(RasterSpikePlot::supports_capability(&ProbeCapability::new("spikes", 1)));
        assert!(!RasterSpikePlot::supports_capability(&ProbeCapability::new("voltages", 1)));
    }

    #[test]
    fn disabling_color_cycle_uses_event_color() {
        let mut p = plot(3);
        p.update(0, 0.01, &SampleBlock::zeros(4, 3));
        let red = Rgb::new(1.0, 0.0, 0.0);
        apply_color(&mut p, "event_color", OptionValue::Color(red)).unwrap();
        apply_color(&mut p, "color_cycle", OptionValue::Bool(false)).unwrap();
        assert!(p.surface().event_rows.iter().all(|r| r.color == red));
    }
}
