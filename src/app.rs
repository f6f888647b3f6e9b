use eframe::egui;

use deputy_viewer::config::AppConfig;

use crate::state::{AppState, Tab};
use crate::ui::{lookup, panels, plot, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DeputyViewerApp {
    pub state: AppState,
}

impl DeputyViewerApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for DeputyViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: active tab ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::tab_bar(ui, &mut self.state);
            ui.separator();
            match self.state.tab {
                Tab::Deputies => {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        tables::deputies_table(ui, &self.state);
                        ui.separator();
                        plot::metric_charts(ui, &self.state);
                    });
                }
                Tab::Posts => {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        panels::posts_controls(ui, &mut self.state);
                        plot::posts_chart(ui, &self.state);
                        tables::posts_table(ui, &self.state);
                    });
                }
                Tab::Lookup => lookup::lookup_tab(ui, &mut self.state),
            }
        });
    }
}
