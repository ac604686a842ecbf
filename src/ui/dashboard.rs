use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use bike_dash::data::view::{DashboardView, FilterOutcome};

use crate::state::{AppState, Tab};
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the title, tab strip and the selected tab.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Bike Sharing Rental Dashboard");
    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.tab, Tab::Analysis, "Analysis");
        ui.selectable_value(&mut state.tab, Tab::About, "About the dataset");
    });
    ui.separator();

    match state.tab {
        Tab::Analysis => analysis_tab(ui, state),
        Tab::About => about_tab(ui),
    }
}

fn analysis_tab(ui: &mut Ui, state: &AppState) {
    let Some(view) = &state.view else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a daily table to start  (File → Open daily table…)");
        });
        return;
    };

    metrics_row(ui, view);
    ui.separator();

    match &view.outcome {
        FilterOutcome::Invalid(e) => {
            ui.label(
                RichText::new(format!(
                    "⚠ {e}. The start date must not be after the end date; pick the range again."
                ))
                .color(Color32::from_rgb(230, 160, 0)),
            );
        }
        FilterOutcome::Empty => {
            ui.label("No data available for the selected filters.");
        }
        FilterOutcome::Rows(_) => {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.strong("Daily rental trend");
                    plot::daily_trend_plot(ui, view);
                    ui.add_space(8.0);

                    ui.strong("Average rentals by hour");
                    plot::hourly_bar_chart(ui, view);
                    ui.add_space(8.0);

                    ui.strong("Casual vs registered riders");
                    plot::rider_split_plot(ui, view);
                    ui.add_space(8.0);

                    ui.strong("Temperature vs rentals");
                    plot::temperature_scatter_plot(ui, view, state.weather_colors.as_ref());
                });
        }
    }
}

fn metrics_row(ui: &mut Ui, view: &DashboardView) {
    ui.columns(2, |cols| {
        metric(&mut cols[0], "Total rentals", &group_thousands(view.total));
        metric(&mut cols[1], "Estimated revenue", &format_usd(view.revenue));
    });
}

fn metric(ui: &mut Ui, label: &str, value: &str) {
    ui.group(|ui: &mut Ui| {
        ui.label(label);
        ui.label(RichText::new(value).size(24.0).strong());
    });
}

fn about_tab(ui: &mut Ui) {
    ScrollArea::vertical().show(ui, |ui: &mut Ui| {
        ui.heading("About the bike sharing dataset");
        ui.label(
            "Historical rental counts from the Capital Bikeshare system in Washington D.C. \
             for 2011 and 2012, at daily and hourly granularity, together with season, \
             weather, temperature, humidity and wind speed.",
        );
        ui.add_space(8.0);

        egui::CollapsingHeader::new(RichText::new("Daily and hourly patterns").strong())
            .default_open(true)
            .show(ui, |ui: &mut Ui| {
                ui.label(
                    "Rentals peak around 08:00 and again at 17:00–18:00 with commuting, and \
                     are lowest between 03:00 and 05:00. Monthly totals climb from the start \
                     of the year to June–July and fall off towards December. 2012 is busier \
                     than 2011 throughout.",
                );
            });

        egui::CollapsingHeader::new(RichText::new("Takeaways").strong())
            .default_open(true)
            .show(ui, |ui: &mut Ui| {
                ui.label("• Rentals rise mid-year, with spikes in the rush hours.");
                ui.label("• Temperature has a strong effect on rental volume.");
                ui.label("• Registered riders clearly outnumber casual riders.");
                ui.label("• Humidity and strong wind lower rentals slightly.");
            });
    });
}

// ---------------------------------------------------------------------------
// Number formatting
// ---------------------------------------------------------------------------

/// `1234567` → `"1,234,567"`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Whole-dollar amount in en-US currency style, `"$1,234.00"`.
pub fn format_usd(dollars: u64) -> String {
    format!("${}.00", group_thousands(dollars))
}
