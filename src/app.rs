use eframe::egui;

use crate::config::ViewerConfig;
use crate::state::{AppState, ViewMode};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PermaPortalApp {
    pub state: AppState,
}

impl PermaPortalApp {
    /// Start on the bundled sample; a missing sample only leaves a status
    /// message.
    pub fn new(config: ViewerConfig) -> Self {
        let mut state = AppState::new(config);
        state.load_sample();
        Self { state }
    }
}

impl eframe::App for PermaPortalApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: load options and time window ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: table or charts ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            ViewMode::Table => table::table_view(ui, &self.state),
            ViewMode::Graph => {
                let height = ui.available_height() * 0.55;
                plot::time_series_plot(ui, &mut self.state, height);
                ui.separator();
                plot::depth_profile_plot(ui, &self.state);
            }
        });
    }
}
