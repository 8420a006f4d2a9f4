use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::config::DashboardConfig;
use crate::pipeline::DISPLAY_CAP;
use crate::state::AppState;
use crate::ui::{charts, panels, table};

pub const TITLE: &str = "GEM Cleaned 2025 — Visualization App";

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    /// Build the app and load the configured CSV straight away.
    pub fn new(config: DashboardConfig) -> Self {
        let mut state = AppState::new(config);
        state.load_configured();
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: source and counts ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: summary, table, charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| dashboard(ui, &self.state));
        });
    }
}

fn dashboard(ui: &mut Ui, state: &AppState) {
    ui.heading(TITLE);

    let Some(dataset) = &state.dataset else {
        match &state.status_message {
            Some(msg) => {
                ui.label(RichText::new(msg).color(Color32::RED).strong());
            }
            None => {
                ui.label("No dataset loaded.");
            }
        }
        return;
    };

    ui.label(RichText::new("Data loaded successfully!").color(Color32::DARK_GREEN));
    ui.label(format!(
        "Rows: {}, Columns: {}",
        dataset.len(),
        dataset.column_names.join(", ")
    ));
    if dataset.is_empty() {
        ui.label(RichText::new("The file has a header but no rows.").italics());
    }
    ui.add_space(8.0);

    ui.heading("Filtered Data Summary");
    let view = &state.view;
    ui.label(RichText::new(format!("Rows after filtering: {}", view.row_count)).strong());
    if view.row_count > DISPLAY_CAP {
        ui.label(format!("Showing a random sample of {DISPLAY_CAP} rows."));
    }
    table::sample_table(ui, dataset, &view.sample);
    ui.add_space(12.0);

    if let Some(rows) = &view.by_status {
        ui.heading("Total Installed Capacity by Status (GW)");
        charts::status_chart(ui, rows, &state.status_colors);
        ui.add_space(12.0);
    }

    if let Some(rows) = &view.by_year {
        ui.heading("Newly Added & Cumulative Capacity by Start Year (GW)");
        ui.strong("Newly Added Capacity by Year (GW)");
        charts::new_capacity_chart(ui, rows);
        ui.add_space(8.0);
        ui.strong("Cumulative Installed Capacity by Year (GW)");
        charts::cumulative_capacity_chart(ui, rows);
    }
}
