//! Standard option side effects, run when the customize window applies a value.

use crate::data::options::OptionValue;
use crate::data::surface::LineKind;
use crate::error::PlotError;
use crate::plots::plot_trait::Plot;

/// Store the value into the option of the same name.
pub fn store(plot: &mut dyn Plot, name: &str, value: OptionValue) -> Result<(), PlotError> {
    plot.options_mut().set_value(name, value)
}

/// Store the new title and re-title the surface.
pub fn set_title(plot: &mut dyn Plot, name: &str, value: OptionValue) -> Result<(), PlotError> {
    store(plot, name, value)?;
    plot.base_mut().refresh_title();
    Ok(())
}

/// Store a line style and restyle the existing lines.
pub fn set_line_kind(plot: &mut dyn Plot, name: &str, value: OptionValue) -> Result<(), PlotError> {
    let kind = value.as_text().and_then(LineKind::from_label);
    store(plot, name, value)?;
    if let Some(kind) = kind {
        for line in plot.surface_mut().lines.iter_mut() {
            line.kind = kind;
        }
    }
    Ok(())
}

/// Store a legend toggle and apply it to the surface.
pub fn set_legend(plot: &mut dyn Plot, name: &str, value: OptionValue) -> Result<(), PlotError> {
    let show = value.as_bool();
    store(plot, name, value)?;
    if let Some(show) = show {
        plot.surface_mut().show_legend = show;
    }
    Ok(())
}

/// Store an axis label option (`x_label` / `y_label`) and mirror it on the surface.
pub fn set_axis_label(plot: &mut dyn Plot, name: &str, value: OptionValue) -> Result<(), PlotError> {
    let text = value.as_text().map(str::to_string);
    store(plot, name, value)?;
    if let Some(text) = text {
        let surface = plot.surface_mut();
        match name {
            "y_label" => surface.y_label = text,
            _ => surface.x_label = text,
        }
    }
    Ok(())
}
