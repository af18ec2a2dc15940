//! Values over time, one line per output dimension.

use crate::data::options::{ConfigOption, OptionValue, Rgb};
use crate::data::samples::{linspace, SampleBlock};
use crate::data::surface::{palette_color, LineKind, LineSeries};
use crate::data::target::Capability;
use crate::error::PlotError;
use crate::plots::effects;
use crate::plots::plot_trait::{BasePlot, Plot, PlotContext, PlotType};

pub struct TimeSeriesPlot {
    base: BasePlot,
}

impl TimeSeriesPlot {
    fn line_color(&self, index: usize) -> Rgb {
        match (index, self.base.options().color("color")) {
            (0, Some(c)) => c,
            _ => palette_color(index),
        }
    }

    fn line_kind(&self) -> LineKind {
        self.base
            .options()
            .text("line_style")
            .and_then(LineKind::from_label)
            .unwrap_or_default()
    }

    pub fn recolor(&mut self) {
        let colors: Vec<Rgb> = (0..self.base.surface().lines.len())
            .map(|i| self.line_color(i))
            .collect();
        for (line, c) in self.base.surface_mut().lines.iter_mut().zip(colors) {
            line.color = c;
        }
    }
}

fn apply_color(plot: &mut dyn Plot, name: &str, value: OptionValue) -> Result<(), PlotError> {
    effects::store(plot, name, value)?;
    if let Some(ts) = plot.downcast_mut::<TimeSeriesPlot>() {
        ts.recolor();
    }
    Ok(())
}

impl PlotType for TimeSeriesPlot {
    const TYPE_NAME: &'static str = "TimeSeriesPlot";

    fn plot_name() -> &'static str {
        "Time Series Plot"
    }

    fn supports_capability(capability: &dyn Capability) -> bool {
        matches!(capability.name().as_str(), "voltages" | "output")
    }

    fn create(ctx: PlotContext) -> Self {
        let mut base = BasePlot::new(ctx, Self::plot_name());
        let data_label = base.options().text("DATA").unwrap_or_default().to_string();
        let opts = base.options_mut();
        // Labels are fixed strings, so the combo cannot fail.
        if let Ok(style) = ConfigOption::combo(
            "line_style",
            "Line style",
            LineKind::ALL.map(|k| k.label()),
            LineKind::Solid.label(),
        ) {
            opts.insert(style.with_on_change(effects::set_line_kind));
        }
        opts.insert(ConfigOption::color("color", "Line colour", palette_color(0)).with_on_change(apply_color));
        opts.insert(ConfigOption::boolean("show_legend", "Show legend", false).with_on_change(effects::set_legend));
        let surface = base.surface_mut();
        surface.x_label = "time".to_string();
        surface.y_label = data_label;
        surface.autoscale_y = true;
        Self { base }
    }
}

impl Plot for TimeSeriesPlot {
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
        let n = data.samples();
        let start_time = start_step as f64 * step_size;
        let end_time = (start_step + n as u64) as f64 * step_size;
        let t = linspace(start_time, end_time, n);
        let kind = self.line_kind();
        let prefix = self.base.options().text("DATA").unwrap_or_default().to_string();

        let lines: Vec<LineSeries> = (0..data.dimensions())
            .map(|d| LineSeries {
                name: format!("{prefix}[{d}]"),
                points: t.iter().zip(data.column(d)).map(|(t, v)| [*t, v]).collect(),
                color: self.line_color(d),
                width: 1.5,
                kind,
            })
            .collect();

        let surface = self.base.surface_mut();
        surface.lines = lines;
        surface.x_limits = (end_time > start_time).then_some((start_time, end_time));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::target::{NamedTarget, ProbeCapability};
    use std::rc::Rc;
    use std::sync::mpsc;

    fn plot() -> TimeSeriesPlot {
        let (tx, _rx) = mpsc::channel();
        TimeSeriesPlot::create(PlotContext::new(
            Rc::new(NamedTarget::new("A")),
            Rc::new(ProbeCapability::new("voltages", 2)),
            tx,
        ))
    }

    #[test]
    fn one_line_per_dimension_over_time() {
        let mut p = plot();
        let data = SampleBlock::from_rows(&[[0.1, 1.0], [0.2, 2.0], [0.3, 3.0]]).unwrap();
        p.update(10, 0.5, &data);
        let s = p.surface();
        assert_eq!(s.lines.len(), 2);
        assert_eq!(s.lines[1].points, vec![[5.0, 1.0], [5.75, 2.0], [6.5, 3.0]]);
        assert_eq!(s.x_limits, Some((5.0, 6.5)));
        assert_eq!(s.y_label, "voltages");
    }

    #[test]
    fn update_is_idempotent() {
        let mut p = plot();
        let data = SampleBlock::from_rows(&[[0.1, 1.0], [0.2, 2.0]]).unwrap();
        p.update(0, 0.001, &data);
        let first = p.surface().lines.clone();
        p.update(0, 0.001, &data);
        assert_eq!(p.surface().lines, first);
    }

    #[test]
    fn line_style_effect_restyles_lines() {
        let mut p = plot();
        p.update(0, 0.1, &SampleBlock::zeros(2, 2));
        effects::set_line_kind(&mut p, "line_style", OptionValue::from("Dashed")).unwrap();
        assert!(p.surface().lines.iter().all(|l| l.kind == LineKind::Dashed));
        assert!(effects::set_line_kind(&mut p, "line_style", OptionValue::from("Wavy")).is_err());
    }

    #[test]
    fn supports_voltages_and_output() {
        assert!(TimeSeriesPlot::supports_capability(&ProbeCapability::new("output", 1)));
        assert!(!TimeSeriesPlot::supports_capability(&ProbeCapability::new("spikes", 1)));
    }
}
