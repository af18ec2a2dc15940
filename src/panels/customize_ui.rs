//! "Customize" window: a form generated from a plot's configurable options.
//!
//! One control is built per configurable option, chosen by the option's type
//! through [`control_spec`]. Applying the form pushes every control's value
//! through its option's side effect and then queues a single redraw.

use crate::data::options::{ConfigOption, OnChange, OptionType, OptionValue, PlotOptions};
use crate::data::template;
use crate::error::PlotError;
use crate::panels::color_ui::{ColorEvent, ColorSelection};
use crate::plots::plot_trait::{Plot, PlotId};

/// Editable state for one option.
#[derive(Clone, Debug, PartialEq)]
pub enum Control {
    TextEntry(String),
    ComboSelect { choices: Vec<String>, selected: usize },
    Toggle(bool),
    ColorChooser(ColorSelection),
}

/// A control value converted back into an option value.
#[derive(Clone, Debug, PartialEq)]
pub struct Extracted {
    pub value: OptionValue,
    /// The text could not be expanded and was passed through literally.
    pub fell_back: bool,
}

/// How to build a control for an option type and read a value back from it.
#[derive(Copy, Clone)]
pub struct ControlSpec {
    pub build: fn(&ConfigOption) -> Result<Control, PlotError>,
    pub extract: fn(&Control, &PlotOptions) -> Option<Extracted>,
}

pub fn control_spec(ty: OptionType) -> ControlSpec {
    match ty {
        OptionType::Text => ControlSpec {
            build: build_text,
            extract: extract_text,
        },
        OptionType::Combo => ControlSpec {
            build: build_combo,
            extract: extract_combo,
        },
        OptionType::Boolean => ControlSpec {
            build: build_toggle,
            extract: extract_toggle,
        },
        OptionType::Color => ControlSpec {
            build: build_color,
            extract: extract_color,
        },
    }
}

fn type_mismatch(opt: &ConfigOption) -> PlotError {
    PlotError::TypeValidation {
        option: opt.name().to_string(),
        expected: opt.option_type(),
        found: opt.value().kind_name(),
    }
}

fn build_text(opt: &ConfigOption) -> Result<Control, PlotError> {
    let s = opt.value().as_text().ok_or_else(|| type_mismatch(opt))?;
    Ok(Control::TextEntry(s.to_string()))
}

fn build_combo(opt: &ConfigOption) -> Result<Control, PlotError> {
    Ok(Control::ComboSelect {
        choices: opt.choices().to_vec(),
        selected: opt.selected_index()?,
    })
}

fn build_toggle(opt: &ConfigOption) -> Result<Control, PlotError> {
    let b = opt.value().as_bool().ok_or_else(|| type_mismatch(opt))?;
    Ok(Control::Toggle(b))
}

fn build_color(opt: &ConfigOption) -> Result<Control, PlotError> {
    let c = opt.value().as_color().ok_or_else(|| type_mismatch(opt))?;
    Ok(Control::ColorChooser(ColorSelection::new(c)))
}

fn extract_text(control: &Control, options: &PlotOptions) -> Option<Extracted> {
    let Control::TextEntry(raw) = control else {
        return None;
    };
    Some(match template::render(raw, options) {
        Ok(s) => Extracted {
            value: OptionValue::Text(s),
            fell_back: false,
        },
        Err(_) => Extracted {
            value: OptionValue::Text(raw.clone()),
            fell_back: true,
        },
    })
}

fn extract_combo(control: &Control, _: &PlotOptions) -> Option<Extracted> {
    let Control::ComboSelect { choices, selected } = control else {
        return None;
    };
    choices.get(*selected).map(|c| Extracted {
        value: OptionValue::Text(c.clone()),
        fell_back: false,
    })
}

fn extract_toggle(control: &Control, _: &PlotOptions) -> Option<Extracted> {
    let Control::Toggle(b) = control else {
        return None;
    };
    Some(Extracted {
        value: OptionValue::Bool(*b),
        fell_back: false,
    })
}

fn extract_color(control: &Control, _: &PlotOptions) -> Option<Extracted> {
    let Control::ColorChooser(sel) = control else {
        return None;
    };
    Some(Extracted {
        value: OptionValue::Color(sel.rgb()),
        fell_back: false,
    })
}

/// One line of the form.
#[derive(Clone, Debug)]
pub struct FormRow {
    pub name: String,
    pub display_name: String,
    pub option_type: OptionType,
    pub control: Control,
}

/// What happened during [`CustomizeWindow::apply_all`].
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub applied: Vec<String>,
    pub fell_back: Vec<String>,
    pub failed: Vec<(String, PlotError)>,
}

pub struct CustomizeWindow {
    plot: PlotId,
    title: String,
    rows: Vec<FormRow>,
}

impl CustomizeWindow {
    /// Build the form for `plot`. Fails if an option's value cannot seed its
    /// control, e.g. a combo value missing from its choices.
    pub fn new(plot: &dyn Plot, name: Option<&str>) -> Result<Self, PlotError> {
        let rows = plot
            .options()
            .configurable()
            .map(|opt| {
                let spec = control_spec(opt.option_type());
                Ok(FormRow {
                    name: opt.name().to_string(),
                    display_name: opt.display_name().to_string(),
                    option_type: opt.option_type(),
                    control: (spec.build)(opt)?,
                })
            })
            .collect::<Result<Vec<_>, PlotError>>()?;
        let title = match name {
            Some(n) => format!("Customize {n}"),
            None => "Customize".to_string(),
        };
        Ok(Self {
            plot: plot.id(),
            title,
            rows,
        })
    }

    pub fn plot_id(&self) -> PlotId {
        self.plot
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn rows(&self) -> &[FormRow] {
        &self.rows
    }

    pub fn control(&self, name: &str) -> Option<&Control> {
        self.rows.iter().find(|r| r.name == name).map(|r| &r.control)
    }

    pub fn control_mut(&mut self, name: &str) -> Option<&mut Control> {
        self.rows
            .iter_mut()
            .find(|r| r.name == name)
            .map(|r| &mut r.control)
    }

    /// Initial or current selection of a combo control.
    pub fn selected_index(&self, name: &str) -> Option<usize> {
        match self.control(name)? {
            Control::ComboSelect { selected, .. } => Some(*selected),
            _ => None,
        }
    }

    /// Read one control back, converted per its option type.
    pub fn value_of(&self, name: &str, options: &PlotOptions) -> Option<Extracted> {
        let row = self.rows.iter().find(|r| r.name == name)?;
        (control_spec(row.option_type).extract)(&row.control, options)
    }

    /// Run every option's side effect with its control's value, then queue
    /// one redraw. A failing option is logged and does not stop the others.
    pub fn apply_all(&self, plot: &mut dyn Plot) -> ApplyReport {
        let mut report = ApplyReport::default();
        let effects: Vec<(String, OnChange)> = plot
            .options()
            .iter()
            .filter_map(|(name, opt)| opt.on_change().map(|f| (name.to_string(), f)))
            .collect();
        for (name, effect) in effects {
            let Some(extracted) = self.value_of(&name, plot.options()) else {
                continue;
            };
            if extracted.fell_back {
                log::debug!("option '{}': applying unexpanded text", name);
                report.fell_back.push(name.clone());
            }
            match effect(plot, &name, extracted.value) {
                Ok(()) => report.applied.push(name),
                Err(e) => {
                    log::warn!("option '{}' not applied: {}", name, e);
                    report.failed.push((name, e));
                }
            }
        }
        plot.surface_mut().queue_draw();
        report
    }

    /// Render the window and apply on any edit. Returns `false` once closed.
    pub fn show(&mut self, ctx: &egui::Context, plot: &mut dyn Plot) -> bool {
        let mut open = true;
        let mut changed = false;
        let id = egui::Id::new(("customize", self.plot.0));
        egui::Window::new(self.title.as_str())
            .id(id)
            .open(&mut open)
            .resizable(false)
            .show(ctx, |ui| {
                egui::Grid::new(id.with("grid"))
                    .num_columns(3)
                    .spacing([10.0, 10.0])
                    .show(ui, |ui| {
                        for row in self.rows.iter_mut() {
                            ui.label(row.display_name.as_str());
                            ui.weak(row.option_type.as_str());
                            changed |= render_control(ui, id.with(&row.name), &mut row.control);
                            ui.end_row();
                        }
                    });
                ui.separator();
                if ui.button("Apply").clicked() {
                    changed = true;
                }
            });

        for row in self.rows.iter_mut() {
            if let Control::ColorChooser(sel) = &mut row.control {
                let title = format!("{} colour", row.display_name);
                match sel.show(ctx, id.with(("color", &row.name)), &title) {
                    ColorEvent::Changed | ColorEvent::Cancelled => changed = true,
                    ColorEvent::Confirmed | ColorEvent::Idle => {}
                }
            }
        }

        if changed {
            self.apply_all(plot);
        }
        open
    }
}

fn render_control(ui: &mut egui::Ui, id: egui::Id, control: &mut Control) -> bool {
    match control {
        Control::TextEntry(s) => ui.text_edit_singleline(s).changed(),
        Control::ComboSelect { choices, selected } => {
            let mut changed = false;
            let current = choices.get(*selected).cloned().unwrap_or_default();
            egui::ComboBox::from_id_salt(id)
                .selected_text(current)
                .show_ui(ui, |ui| {
                    for (i, c) in choices.iter().enumerate() {
                        if ui.selectable_label(i == *selected, c.as_str()).clicked() && i != *selected {
                            *selected = i;
                            changed = true;
                        }
                    }
                });
            changed
        }
        Control::Toggle(b) => ui.checkbox(b, "").changed(),
        Control::ColorChooser(sel) => {
            ui.horizontal(|ui| {
                egui::color_picker::show_color(ui, sel.current_color32(), egui::vec2(18.0, 18.0));
                let label = format!("{} Color chooser...", egui_phosphor::regular::PALETTE);
                if ui.button(label).clicked() {
                    sel.open();
                }
            });
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_extract_falls_back_to_literal() {
        let mut opts = PlotOptions::new();
        opts.insert(ConfigOption::fixed("TARGET", "ens"));
        let ok = extract_text(&Control::TextEntry("{TARGET}!".into()), &opts).unwrap();
        assert_eq!(ok.value, OptionValue::from("ens!"));
        assert!(!ok.fell_back);
        let raw = extract_text(&Control::TextEntry("{nope".into()), &opts).unwrap();
        assert_eq!(raw.value, OptionValue::from("{nope"));
        assert!(raw.fell_back);
    }

    #[test]
    fn combo_build_selects_current_value() {
        let opt = ConfigOption::combo("k", "K", ["a", "b", "c"], "c").unwrap();
        let c = (control_spec(OptionType::Combo).build)(&opt).unwrap();
        assert_eq!(
            c,
            Control::ComboSelect {
                choices: vec!["a".into(), "b".into(), "c".into()],
                selected: 2
            }
        );
    }

    #[test]
    fn extractor_rejects_foreign_control() {
        let opts = PlotOptions::new();
        assert!(extract_toggle(&Control::TextEntry("x".into()), &opts).is_none());
    }
}
