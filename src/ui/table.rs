use eframe::egui::{ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::Dataset;

/// Sampled rows of the filtered set, every column of the file.
pub fn sample_table(ui: &mut Ui, dataset: &Dataset, sample: &[usize]) {
    if dataset.column_names.is_empty() {
        return;
    }

    ScrollArea::horizontal()
        .id_salt("sample_table_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .vscroll(false)
                .columns(
                    Column::auto().at_least(60.0).clip(true),
                    dataset.column_names.len(),
                )
                .header(20.0, |mut header| {
                    for name in &dataset.column_names {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|mut body| {
                    for &idx in sample {
                        let record = &dataset.records[idx];
                        body.row(18.0, |mut row| {
                            for name in &dataset.column_names {
                                row.col(|ui: &mut Ui| {
                                    let cell = record.get(name);
                                    if cell.is_missing() {
                                        ui.weak("NaN");
                                    } else {
                                        ui.label(cell.to_string());
                                    }
                                });
                            }
                        });
                    }
                });
        });
}
