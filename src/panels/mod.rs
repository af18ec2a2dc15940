pub mod color_ui;
pub mod customize_ui;
pub mod plot_ui;

pub use color_ui::{ColorEvent, ColorSelection};
pub use customize_ui::{ApplyReport, Control, CustomizeWindow};
