use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::color::ColorMap;
use crate::data::aggregate::{StatusCapacity, YearCapacity};

const CHART_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Capacity by status
// ---------------------------------------------------------------------------

/// Bar per status, tallest first.
pub fn status_chart(ui: &mut Ui, rows: &[StatusCapacity], colors: &ColorMap) {
    let mut rows: Vec<&StatusCapacity> = rows.iter().collect();
    rows.sort_by(|a, b| b.total_capacity_gw.total_cmp(&a.total_capacity_gw));

    let labels: Vec<String> = rows.iter().map(|r| r.status.clone()).collect();
    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Bar::new(i as f64, r.total_capacity_gw)
                .name(&r.status)
                .fill(colors.color_for(&r.status))
                .width(0.7)
        })
        .collect();

    Plot::new("capacity_by_status")
        .height(CHART_HEIGHT)
        .y_axis_label("Installed Capacity (GW)")
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Installed capacity (GW)"));
        });
}

/// Axis ticks land on every value; only whole indices get a label.
fn category_label(labels: &[String], value: f64) -> String {
    if value < 0.0 || value.fract() != 0.0 {
        return String::new();
    }
    labels.get(value as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Capacity by start year
// ---------------------------------------------------------------------------

/// Newly added capacity per start year.
pub fn new_capacity_chart(ui: &mut Ui, rows: &[YearCapacity]) {
    let bars: Vec<Bar> = rows
        .iter()
        .map(|r| {
            Bar::new(r.year, r.new_capacity_gw)
                .name(format!("{:.0}", r.year))
                .fill(Color32::from_rgb(70, 130, 180))
                .width(0.8)
        })
        .collect();

    Plot::new("new_capacity_by_year")
        .height(CHART_HEIGHT)
        .x_axis_label("Start Year")
        .y_axis_label("Newly Added Capacity (GW)")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("New capacity (GW)"));
        });
}

/// Running total of capacity over start years, as a line with markers.
pub fn cumulative_capacity_chart(ui: &mut Ui, rows: &[YearCapacity]) {
    let points: Vec<[f64; 2]> = rows
        .iter()
        .map(|r| [r.year, r.cumulative_capacity_gw])
        .collect();
    let color = Color32::from_rgb(230, 120, 40);

    Plot::new("cumulative_capacity_by_year")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Start Year")
        .y_axis_label("Cumulative Capacity (GW)")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::new(points.clone()))
                    .name("Cumulative capacity (GW)")
                    .color(color)
                    .width(2.0),
            );
            plot_ui.points(Points::new(PlotPoints::new(points)).color(color).radius(3.0));
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_whole_in_range_ticks_are_labelled() {
        let labels = vec!["operating".to_string(), "retired".to_string()];
        assert_eq!(category_label(&labels, 0.0), "operating");
        assert_eq!(category_label(&labels, 1.0), "retired");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 2.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }
}
