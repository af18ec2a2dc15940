//! Per-plot configuration options.
//!
//! Every plot owns a [`PlotOptions`] map. Each entry is a typed
//! [`ConfigOption`] carrying the metadata the customize window needs to build
//! a control for it (display name, type, choices) and an optional side effect
//! that is run when the user applies a new value.

use std::fmt;

use eframe::egui::Color32;
use indexmap::IndexMap;

use crate::error::PlotError;
use crate::plots::plot_trait::Plot;

/// Side effect invoked by the customize window with the option name and the
/// newly applied value.
pub type OnChange = fn(&mut dyn Plot, &str, OptionValue) -> Result<(), PlotError>;

/// The data type of an option; decides which control edits it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OptionType {
    Text,
    Combo,
    Boolean,
    Color,
}

impl OptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Text => "text",
            OptionType::Combo => "combo",
            OptionType::Boolean => "boolean",
            OptionType::Color => "color",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized RGB colour, each channel in `[0, 1]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from 16-bit colour chooser channels (0..=65535).
    pub fn from_u16(r: u16, g: u16, b: u16) -> Self {
        Self {
            r: r as f32 / 65535.0,
            g: g as f32 / 65535.0,
            b: b as f32 / 65535.0,
        }
    }

    /// Alpha is discarded.
    pub fn from_color32(c: Color32) -> Self {
        Self {
            r: c.r() as f32 / 255.0,
            g: c.g() as f32 / 255.0,
            b: c.b() as f32 / 255.0,
        }
    }

    pub fn to_color32(self) -> Color32 {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Color32::from_rgb(q(self.r), q(self.g), q(self.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?}, {:?})", self.r, self.g, self.b)
    }
}

/// Current value of an option. `Text` backs both text and combo options.
#[derive(Clone, Debug, PartialEq)]
pub enum OptionValue {
    Text(String),
    Bool(bool),
    Color(Rgb),
}

impl OptionValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            OptionValue::Text(_) => "text",
            OptionValue::Bool(_) => "bool",
            OptionValue::Color(_) => "color",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            OptionValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Rgb> {
        match self {
            OptionValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    fn matches(&self, ty: OptionType) -> bool {
        matches!(
            (ty, self),
            (OptionType::Text, OptionValue::Text(_))
                | (OptionType::Combo, OptionValue::Text(_))
                | (OptionType::Boolean, OptionValue::Bool(_))
                | (OptionType::Color, OptionValue::Color(_))
        )
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Text(s) => f.write_str(s),
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Color(c) => write!(f, "{}", c),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Text(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Text(s)
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<Rgb> for OptionValue {
    fn from(c: Rgb) -> Self {
        OptionValue::Color(c)
    }
}

/// A single named, typed, configurable value.
#[derive(Clone, Debug)]
pub struct ConfigOption {
    name: String,
    display_name: String,
    option_type: OptionType,
    value: OptionValue,
    choices: Vec<String>,
    configurable: bool,
    on_change: Option<OnChange>,
}

impl ConfigOption {
    /// Generic constructor; validates `value` against `option_type` and, for
    /// combos, against `choices`.
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        option_type: OptionType,
        value: OptionValue,
        choices: Vec<String>,
    ) -> Result<Self, PlotError> {
        let opt = Self {
            name: name.into(),
            display_name: display_name.into(),
            option_type,
            value,
            choices,
            configurable: true,
            on_change: None,
        };
        if opt.option_type == OptionType::Combo && opt.choices.is_empty() {
            return Err(PlotError::EmptyChoices(opt.name));
        }
        opt.validate(&opt.value)?;
        Ok(opt)
    }

    pub fn text(name: impl Into<String>, display_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            option_type: OptionType::Text,
            value: OptionValue::Text(value.into()),
            choices: Vec::new(),
            configurable: true,
            on_change: None,
        }
    }

    pub fn boolean(name: impl Into<String>, display_name: impl Into<String>, value: bool) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            option_type: OptionType::Boolean,
            value: OptionValue::Bool(value),
            choices: Vec::new(),
            configurable: true,
            on_change: None,
        }
    }

    pub fn color(name: impl Into<String>, display_name: impl Into<String>, value: Rgb) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            option_type: OptionType::Color,
            value: OptionValue::Color(value),
            choices: Vec::new(),
            configurable: true,
            on_change: None,
        }
    }

    pub fn combo<S: Into<String>>(
        name: impl Into<String>,
        display_name: impl Into<String>,
        choices: impl IntoIterator<Item = S>,
        value: impl Into<String>,
    ) -> Result<Self, PlotError> {
        Self::new(
            name,
            display_name,
            OptionType::Combo,
            OptionValue::Text(value.into()),
            choices.into_iter().map(Into::into).collect(),
        )
    }

    /// A derived, read-only text value (e.g. the target label). Excluded from
    /// the customize form but available to title templates.
    pub fn fixed(name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            option_type: OptionType::Text,
            value: OptionValue::Text(value.into()),
            choices: Vec::new(),
            configurable: false,
            on_change: None,
        }
    }

    pub fn with_on_change(mut self, f: OnChange) -> Self {
        self.on_change = Some(f);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    pub fn value(&self) -> &OptionValue {
        &self.value
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn configurable(&self) -> bool {
        self.configurable
    }

    pub fn on_change(&self) -> Option<OnChange> {
        self.on_change
    }

    /// Position of the current value within `choices` (combo options only).
    pub fn selected_index(&self) -> Result<usize, PlotError> {
        let value = self.value.as_text().unwrap_or_default();
        self.choices
            .iter()
            .position(|c| c == value)
            .ok_or_else(|| PlotError::ComboValueNotInChoices {
                option: self.name.clone(),
                value: value.to_string(),
            })
    }

    /// Assign a new value after checking it against the option's type.
    pub fn set_value(&mut self, value: impl Into<OptionValue>) -> Result<(), PlotError> {
        let value = value.into();
        self.validate(&value)?;
        self.value = value;
        Ok(())
    }

    fn validate(&self, value: &OptionValue) -> Result<(), PlotError> {
        if !value.matches(self.option_type) {
            return Err(PlotError::TypeValidation {
                option: self.name.clone(),
                expected: self.option_type,
                found: value.kind_name(),
            });
        }
        if self.option_type == OptionType::Combo {
            let v = value.as_text().unwrap_or_default();
            if !self.choices.iter().any(|c| c == v) {
                return Err(PlotError::ComboValueNotInChoices {
                    option: self.name.clone(),
                    value: v.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Insertion-ordered mapping of option name to option.
#[derive(Clone, Debug, Default)]
pub struct PlotOptions {
    entries: IndexMap<String, ConfigOption>,
}

impl PlotOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an option, keyed by its name. A replaced option keeps
    /// its original position.
    pub fn insert(&mut self, option: ConfigOption) {
        self.entries.insert(option.name.clone(), option);
    }

    pub fn get(&self, name: &str) -> Option<&ConfigOption> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ConfigOption> {
        self.entries.get_mut(name)
    }

    pub fn value(&self, name: &str) -> Option<&OptionValue> {
        self.entries.get(name).map(|o| &o.value)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(OptionValue::as_text)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.value(name).and_then(OptionValue::as_bool)
    }

    pub fn color(&self, name: &str) -> Option<Rgb> {
        self.value(name).and_then(OptionValue::as_color)
    }

    pub fn set_value(&mut self, name: &str, value: impl Into<OptionValue>) -> Result<(), PlotError> {
        self.entries
            .get_mut(name)
            .ok_or_else(|| PlotError::UnknownOption(name.to_string()))?
            .set_value(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigOption)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Options shown in the customize form, in layout order.
    pub fn configurable(&self) -> impl Iterator<Item = &ConfigOption> {
        self.entries.values().filter(|o| o.configurable)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_option_rejects_bool() {
        let mut opt = ConfigOption::text("title", "Title", "x");
        let err = opt.set_value(true).unwrap_err();
        assert!(matches!(err, PlotError::TypeValidation { expected: OptionType::Text, .. }));
        assert_eq!(opt.value(), &OptionValue::Text("x".into()));
    }

    #[test]
    fn combo_requires_value_in_choices() {
        let err = ConfigOption::combo("style", "Style", ["Solid", "Dashed"], "Wavy").unwrap_err();
        assert!(matches!(err, PlotError::ComboValueNotInChoices { .. }));

        let mut opt = ConfigOption::combo("style", "Style", ["Solid", "Dashed"], "Dashed").unwrap();
        assert_eq!(opt.selected_index().unwrap(), 1);
        assert!(opt.set_value("Dotted").is_err());
        opt.set_value("Solid").unwrap();
        assert_eq!(opt.selected_index().unwrap(), 0);
    }

    #[test]
    fn combo_without_choices_is_rejected() {
        let err = ConfigOption::combo("style", "Style", Vec::<String>::new(), "Solid").unwrap_err();
        assert_eq!(err, PlotError::EmptyChoices("style".into()));
    }

    #[test]
    fn rgb_from_u16_full_red() {
        assert_eq!(Rgb::from_u16(65535, 0, 0), Rgb::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn colour_displays_every_channel_as_float() {
        assert_eq!(Rgb::new(1.0, 0.0, 0.5).to_string(), "(1.0, 0.0, 0.5)");
    }

    #[test]
    fn options_keep_insertion_order_and_skip_fixed() {
        let mut opts = PlotOptions::new();
        opts.insert(ConfigOption::text("title", "Title", "{TARGET}"));
        opts.insert(ConfigOption::fixed("TARGET", "A"));
        opts.insert(ConfigOption::boolean("legend", "Legend", true));
        let names: Vec<&str> = opts.configurable().map(|o| o.name()).collect();
        assert_eq!(names, vec!["title", "legend"]);
        assert_eq!(opts.len(), 3);
        assert!(opts.set_value("missing", true).is_err());
    }
}
