use std::collections::BTreeSet;

use bike_dash::data::filter::FilterCriteria;
use bike_dash::data::model::{DailyRecord, HourlyRecord, RecordStore, WeatherSituation};
use bike_dash::data::view::DashboardView;

use crate::color::WeatherColors;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Analysis,
    About,
}

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded tables (None until a dataset is available).
    pub store: Option<RecordStore>,

    /// Current side-panel selection.
    pub criteria: Option<FilterCriteria>,

    /// Filter result and aggregates for `criteria`.
    pub view: Option<DashboardView>,

    /// Colours for the weather situations present in the daily table.
    pub weather_colors: Option<WeatherColors>,

    pub tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a freshly loaded store and reset the filters to the full range.
    pub fn set_store(&mut self, store: RecordStore) {
        self.criteria = FilterCriteria::full_range(&store);
        let situations: BTreeSet<WeatherSituation> =
            store.daily().iter().map(|r| r.weather).collect();
        self.weather_colors = Some(WeatherColors::new(&situations));
        self.store = Some(store);
        self.status_message = None;
        self.refilter();
    }

    /// Swap in a new daily table; criteria are reset because the date span
    /// and seasons may differ.
    pub fn replace_daily(&mut self, daily: Vec<DailyRecord>) {
        let store = self.store.take().unwrap_or_default().with_daily(daily);
        self.set_store(store);
    }

    /// Swap in a new hourly table; the daily selection is kept.
    pub fn replace_hourly(&mut self, hourly: Vec<HourlyRecord>) {
        let store = self.store.take().unwrap_or_default().with_hourly(hourly);
        self.store = Some(store);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the view from scratch for the current criteria.
    pub fn refilter(&mut self) {
        self.view = match (&self.store, &self.criteria) {
            (Some(store), Some(criteria)) => Some(DashboardView::compute(store, criteria)),
            _ => None,
        };
    }

    /// Apply an edited selection; recomputes only if something changed.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        if self.criteria.as_ref() != Some(&criteria) {
            self.criteria = Some(criteria);
            self.refilter();
        }
    }
}
