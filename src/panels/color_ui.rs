//! Colour selection sub-dialog used by colour options.

use egui::color_picker::{self, Alpha};
use egui::Color32;

use crate::data::options::Rgb;

/// Outcome of one frame of the colour dialog.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColorEvent {
    /// Nothing happened, or the dialog is closed.
    Idle,
    /// The user picked a new colour; not yet confirmed.
    Changed,
    Confirmed,
    /// The dialog was dismissed and the colour reverted.
    Cancelled,
}

/// A colour held at 16 bits per channel, with the colour that was selected
/// when the dialog was last opened.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorSelection {
    current: [u16; 3],
    previous: [u16; 3],
    open: bool,
}

fn widen(v: u8) -> u16 {
    v as u16 * 257
}

impl ColorSelection {
    pub fn new(color: Rgb) -> Self {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 65535.0).round() as u16;
        let c = [q(color.r), q(color.g), q(color.b)];
        Self {
            current: c,
            previous: c,
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open the dialog, remembering the current colour for [`Self::cancel`].
    pub fn open(&mut self) {
        self.previous = self.current;
        self.open = true;
    }

    pub fn set_current_color(&mut self, r: u16, g: u16, b: u16) {
        self.current = [r, g, b];
    }

    pub fn current_color(&self) -> [u16; 3] {
        self.current
    }

    pub fn previous_color(&self) -> [u16; 3] {
        self.previous
    }

    pub fn set_current_color32(&mut self, c: Color32) {
        self.current = [widen(c.r()), widen(c.g()), widen(c.b())];
    }

    pub fn current_color32(&self) -> Color32 {
        let [r, g, b] = self.current.map(|v| (v >> 8) as u8);
        Color32::from_rgb(r, g, b)
    }

    pub fn confirm(&mut self) {
        self.open = false;
    }

    pub fn cancel(&mut self) {
        self.current = self.previous;
        self.open = false;
    }

    /// Current colour normalized to `[0, 1]`.
    pub fn rgb(&self) -> Rgb {
        let [r, g, b] = self.current;
        Rgb::from_u16(r, g, b)
    }

    pub fn show(&mut self, ctx: &egui::Context, id: egui::Id, title: &str) -> ColorEvent {
        if !self.open {
            return ColorEvent::Idle;
        }
        let mut event = ColorEvent::Idle;
        let mut still_open = true;
        egui::Window::new(title)
            .id(id)
            .collapsible(false)
            .resizable(false)
            .open(&mut still_open)
            .show(ctx, |ui| {
                let mut c = self.current_color32();
                if color_picker::color_picker_color32(ui, &mut c, Alpha::Opaque) {
                    self.set_current_color32(c);
                    event = ColorEvent::Changed;
                }
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        event = ColorEvent::Confirmed;
                    }
                    if ui.button("Cancel").clicked() {
                        event = ColorEvent::Cancelled;
                    }
                });
            });
        if !still_open {
            event = ColorEvent::Cancelled;
        }
        match event {
            ColorEvent::Confirmed => self.confirm(),
            ColorEvent::Cancelled => self.cancel(),
            _ => {}
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_red_normalizes_to_unit_triple() {
        let mut sel = ColorSelection::new(Rgb::BLACK);
        sel.set_current_color(65535, 0, 0);
        assert_eq!(sel.rgb(), Rgb::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn cancel_reverts_to_previous() {
        let mut sel = ColorSelection::new(Rgb::new(0.0, 0.0, 1.0));
        sel.open();
        sel.set_current_color(65535, 65535, 0);
        sel.cancel();
        assert_eq!(sel.rgb(), Rgb::new(0.0, 0.0, 1.0));
        assert!(!sel.is_open());
    }

    #[test]
    fn confirm_keeps_choice() {
        let mut sel = ColorSelection::new(Rgb::BLACK);
        sel.open();
        sel.set_current_color32(Color32::from_rgb(255, 0, 255));
        sel.confirm();
        assert_eq!(sel.rgb(), Rgb::new(1.0, 0.0, 1.0));
        assert_eq!(sel.current_color32(), Color32::from_rgb(255, 0, 255));
    }
}
