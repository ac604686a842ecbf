use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};

use bike_dash::data::model::WeatherSituation;
use bike_dash::data::view::DashboardView;

use crate::color::{self, WeatherColors};

const PLOT_HEIGHT: f32 = 260.0;

// Dates are plotted as days since 0001-01-01 (CE).

fn day_number(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

fn date_axis(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

/// Rentals per day over the filtered range.
pub fn daily_trend_plot(ui: &mut Ui, view: &DashboardView) {
    let points: PlotPoints = view
        .daily
        .iter()
        .map(|p| [day_number(p.date), p.total as f64])
        .collect();

    Plot::new("daily_trend")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Date")
        .y_axis_label("Rentals")
        .x_axis_formatter(date_axis)
        .allow_boxed_zoom(true)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).name("Rentals").width(1.5));
        });
}

/// Mean rentals per hour of day, shaded by value.
pub fn hourly_bar_chart(ui: &mut Ui, view: &DashboardView) {
    let max = view.hourly.iter().map(|h| h.mean).fold(0.0, f64::max);
    let bars: Vec<Bar> = view
        .hourly
        .iter()
        .map(|h| {
            let shade = if max > 0.0 { h.mean / max } else { 0.0 };
            Bar::new(f64::from(h.hour), h.mean)
                .width(0.8)
                .fill(color::blues(shade))
        })
        .collect();

    Plot::new("hourly_average")
        .height(PLOT_HEIGHT)
        .x_axis_label("Hour")
        .y_axis_label("Mean rentals")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Mean rentals"));
        });
}

/// Casual and registered riders per day.
pub fn rider_split_plot(ui: &mut Ui, view: &DashboardView) {
    let casual: PlotPoints = view
        .dual
        .iter()
        .map(|p| [day_number(p.date), p.casual as f64])
        .collect();
    let registered: PlotPoints = view
        .dual
        .iter()
        .map(|p| [day_number(p.date), p.registered as f64])
        .collect();

    Plot::new("rider_split")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Date")
        .y_axis_label("Rentals")
        .x_axis_formatter(date_axis)
        .allow_boxed_zoom(true)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(casual).name("casual").color(color::CASUAL).width(1.5));
            plot_ui.line(
                Line::new(registered)
                    .name("registered")
                    .color(color::REGISTERED)
                    .width(1.5),
            );
        });
}

/// Temperature against rentals, one series per weather situation.
pub fn temperature_scatter_plot(
    ui: &mut Ui,
    view: &DashboardView,
    colors: Option<&WeatherColors>,
) {
    let mut by_weather: BTreeMap<WeatherSituation, Vec<[f64; 2]>> = BTreeMap::new();
    for p in &view.scatter {
        by_weather
            .entry(p.weather)
            .or_default()
            .push([p.temperature, f64::from(p.total)]);
    }

    Plot::new("temperature_scatter")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Temperature (normalised)")
        .y_axis_label("Rentals")
        .show(ui, |plot_ui| {
            for (weather, pts) in by_weather {
                let mut series = Points::new(PlotPoints::from(pts))
                    .radius(3.0)
                    .name(weather.to_string());
                if let Some(colors) = colors {
                    series = series.color(colors.color_for(weather));
                }
                plot_ui.points(series);
            }
        });
}
