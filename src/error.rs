//! Error types shared by the option model, plots and registry.

use crate::data::options::OptionType;

/// Failures raised by plot configuration and plot lifecycle operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PlotError {
    #[error("option '{option}' expects a {expected} value, got {found}")]
    TypeValidation {
        option: String,
        expected: OptionType,
        found: &'static str,
    },
    #[error("option '{option}': value '{value}' is not one of its choices")]
    ComboValueNotInChoices { option: String, value: String },
    #[error("combo option '{0}' has no choices")]
    EmptyChoices(String),
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    #[error("plot type '{type_name}' does not implement {what}")]
    NotImplemented {
        type_name: String,
        what: &'static str,
    },
    #[error("no plot type registered as '{0}'")]
    UnknownPlotType(String),
    #[error("plot type '{plot_type}' cannot display '{capability}'")]
    UnsupportedCapability {
        plot_type: String,
        capability: String,
    },
    #[error("no probe for '{capability}' on '{target}'")]
    UnknownStream { target: String, capability: String },
    #[error("sample block shape mismatch: expected {expected} values, got {found}")]
    Shape { expected: usize, found: usize },
}
