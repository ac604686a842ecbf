use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use bike_dash::data::loader;
use bike_dash::data::model::Season;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Data");
    ui.separator();

    let (years, available) = match &state.store {
        Some(store) if !store.daily().is_empty() => (store.years(), store.seasons()),
        _ => {
            ui.label("No dataset loaded.");
            return;
        }
    };
    let Some(mut criteria) = state.criteria.clone() else {
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Year ----
            ui.strong("Year");
            egui::ComboBox::from_id_salt("year")
                .selected_text(criteria.year.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for year in &years {
                        ui.selectable_value(&mut criteria.year, *year, year.to_string());
                    }
                });
            ui.separator();

            // ---- Date range ----
            ui.strong("Start date");
            ui.add(DatePickerButton::new(&mut criteria.start).id_salt("start_date"));
            ui.strong("End date");
            ui.add(DatePickerButton::new(&mut criteria.end).id_salt("end_date"));
            ui.separator();

            // ---- Seasons ----
            let header_text = format!("Seasons  ({}/{})", criteria.seasons.len(), available.len());
            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("seasons")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            criteria.seasons = available.clone();
                        }
                        if ui.small_button("None").clicked() {
                            criteria.seasons.clear();
                        }
                    });

                    for season in &available {
                        let mut checked = criteria.seasons.contains(season);
                        if ui.checkbox(&mut checked, season.to_string()).changed() {
                            if checked {
                                criteria.seasons.insert(*season);
                            } else {
                                criteria.seasons.remove(season);
                            }
                        }
                    }
                });
            ui.separator();

            season_legend(ui);

            if let Some(colors) = &state.weather_colors {
                ui.separator();
                ui.strong("Weather situations");
                for (label, color) in colors.legend_entries() {
                    ui.label(RichText::new(label).color(color));
                }
            }
        });

    state.set_criteria(criteria);
}

fn season_legend(ui: &mut Ui) {
    ui.strong("Season codes");
    for season in Season::ALL {
        ui.label(format!("{} → {}", season.code(), season.label()));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open daily table…").clicked() {
                open_file_dialog(state, TableKind::Daily);
                ui.close_menu();
            }
            if ui.button("Open hourly table…").clicked() {
                open_file_dialog(state, TableKind::Hourly);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(store) = &state.store {
            let visible = state
                .view
                .as_ref()
                .map_or(0, |view| view.outcome.rows().len());
            ui.label(format!(
                "{} days, {} hourly rows loaded, {} days selected",
                store.daily().len(),
                store.hourly().len(),
                visible
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub enum TableKind {
    Daily,
    Hourly,
}

pub fn open_file_dialog(state: &mut AppState, kind: TableKind) {
    let title = match kind {
        TableKind::Daily => "Open daily rental table",
        TableKind::Hourly => "Open hourly rental table",
    };
    let file = rfd::FileDialog::new()
        .set_title(title)
        .add_filter("Supported files", &["csv", "parquet", "pq", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    let Some(path) = file else {
        return;
    };

    let result = match kind {
        TableKind::Daily => loader::load_daily(&path).map(|rows| {
            log::info!("Loaded {} daily records from {}", rows.len(), path.display());
            state.replace_daily(rows);
        }),
        TableKind::Hourly => loader::load_hourly(&path).map(|rows| {
            log::info!("Loaded {} hourly records from {}", rows.len(), path.display());
            state.replace_hourly(rows);
        }),
    };

    if let Err(e) = result {
        log::error!("Failed to load file: {e:#}");
        state.status_message = Some(format!("Error: {e:#}"));
    }
}
