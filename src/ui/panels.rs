use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::ALL_LABEL;
use crate::state::AppState;

/// A sidebar edit, applied after the widgets are drawn so the state is not
/// borrowed while rendering.
enum SidebarAction {
    IncludeAll(String, bool),
    Toggle(String, String),
    YearRange(i64, i64),
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // Built by `refilter`, not per frame.
    let columns = &state.sidebar_options;

    let mut actions = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (col, options) in columns {
                let Some(select) = state.selections.get(col) else {
                    continue;
                };

                let summary = if select.include_all || select.chosen.is_empty() {
                    "all".to_string()
                } else {
                    format!("{}/{}", select.chosen.len(), options.len())
                };

                egui::CollapsingHeader::new(RichText::new(format!("{col}  ({summary})")).strong())
                    .id_salt(col)
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        let mut include_all = select.include_all;
                        if ui.checkbox(&mut include_all, ALL_LABEL).changed() {
                            actions.push(SidebarAction::IncludeAll(col.clone(), include_all));
                        }
                        ui.separator();

                        ui.add_enabled_ui(!select.include_all, |ui: &mut Ui| {
                            for value in options {
                                let mut checked = select.chosen.contains(value);
                                if ui.checkbox(&mut checked, value).changed() {
                                    actions.push(SidebarAction::Toggle(col.clone(), value.clone()));
                                }
                            }
                        });
                    });
            }

            ui.separator();
            ui.strong("Start year range");
            let bounds = state.year_bounds;
            let mut low = state.year_range.low;
            let mut high = state.year_range.high;
            let low_changed = ui
                .add(egui::Slider::new(&mut low, bounds.low..=bounds.high).text("from"))
                .changed();
            let high_changed = ui
                .add(egui::Slider::new(&mut high, bounds.low..=bounds.high).text("to"))
                .changed();
            if low_changed || high_changed {
                if low_changed && low > high {
                    high = low;
                } else if high_changed && high < low {
                    low = high;
                }
                actions.push(SidebarAction::YearRange(low, high));
            }
        });

    for action in actions {
        match action {
            SidebarAction::IncludeAll(col, on) => state.set_include_all(&col, on),
            SidebarAction::Toggle(col, value) => state.toggle_value(&col, &value),
            SidebarAction::YearRange(low, high) => state.set_year_range(low, high),
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top status strip: source file, row counts and any error.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        if let (Some(ds), Some(path)) = (&state.dataset, &state.source_path) {
            ui.label(RichText::new(path.display().to_string()).monospace());
            ui.separator();
            ui.label(format!(
                "{} plants loaded, {} after filtering",
                ds.len(),
                state.view.row_count
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}
