//! Top menu bar.

use eframe::egui;
use egui_phosphor::regular as icons;

use crate::plots::registry;

use super::VisualizerApp;

impl VisualizerApp {
    pub(super) fn render_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| self.file_menu(ui));
                ui.menu_button("View", |ui| self.view_menu(ui));
                ui.menu_button("Plots", |ui| self.plots_menu(ui));
            });
        });
    }

    fn file_menu(&mut self, ui: &mut egui::Ui) {
        let export = ui
            .add_enabled(
                !self.plots.is_empty(),
                egui::Button::new(format!("{} Export all plots…", icons::EXPORT)),
            )
            .on_hover_text("Save every plot as a PNG into a folder");
        if export.clicked() {
            ui.close();
            if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                let failed = self.export_all(&dir);
                if failed.is_empty() {
                    log::info!("exported {} plots to {}", self.plots.len(), dir.display());
                }
            }
        }
        ui.separator();
        if ui.button(format!("{} Quit", icons::SIGN_OUT)).clicked() {
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn view_menu(&mut self, ui: &mut egui::Ui) {
        if self.plots.is_empty() {
            ui.weak("No plots");
        }
        for e in self.plots.values_mut() {
            let title = e.plot.title();
            ui.checkbox(&mut e.visible, title);
        }
        ui.separator();
        ui.horizontal(|ui| {
            ui.label("Columns:");
            ui.add(egui::DragValue::new(&mut self.cfg.columns).range(1..=8));
        });
    }

    fn plots_menu(&mut self, ui: &mut egui::Ui) {
        let mut chosen: Option<(&'static str, String, String)> = None;
        {
            let reg = registry::read();
            for probe in &self.probes {
                let (target, capability) = probe.key();
                let supported = reg.supporting(probe.capability.as_ref());
                ui.add_enabled_ui(!supported.is_empty(), |ui| {
                    ui.menu_button(format!("{target} · {capability}"), |ui| {
                        for desc in supported {
                            if ui.button(desc.plot_name).clicked() {
                                chosen = Some((desc.type_name, target.clone(), capability.clone()));
                                ui.close();
                            }
                        }
                    });
                });
            }
        }
        if self.probes.is_empty() {
            ui.weak("Nothing to plot");
        }
        if let Some((type_name, target, capability)) = chosen {
            if let Err(e) = self.add_plot(type_name, &target, &capability) {
                log::error!("cannot add plot: {e}");
            }
        }
    }
}
