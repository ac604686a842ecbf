use super::aggregate::{self, DailyTotal, HourlyMean, RiderSplit, TemperaturePoint};
use super::error::ValidationError;
use super::filter::{self, FilterCriteria};
use super::model::{DailyRecord, RecordStore};

/// What the filter produced, kept apart so the UI can word each case
/// differently.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome {
    Invalid(ValidationError),
    Empty,
    Rows(Vec<DailyRecord>),
}

impl FilterOutcome {
    pub fn rows(&self) -> &[DailyRecord] {
        match self {
            FilterOutcome::Rows(rows) => rows,
            FilterOutcome::Invalid(_) | FilterOutcome::Empty => &[],
        }
    }
}

/// Everything the dashboard draws for one filter selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub outcome: FilterOutcome,
    pub total: u64,
    pub revenue: u64,
    pub daily: Vec<DailyTotal>,
    /// Always over the full hourly table, independent of the filter.
    pub hourly: Vec<HourlyMean>,
    pub dual: Vec<RiderSplit>,
    pub scatter: Vec<TemperaturePoint>,
}

impl DashboardView {
    /// Run the filter and every aggregate from scratch.
    pub fn compute(store: &RecordStore, criteria: &FilterCriteria) -> Self {
        let outcome = match filter::filter(store.daily(), criteria) {
            Err(e) => FilterOutcome::Invalid(e),
            Ok(rows) if rows.is_empty() => FilterOutcome::Empty,
            Ok(rows) => FilterOutcome::Rows(rows),
        };

        let rows = outcome.rows();
        let total = aggregate::total_count(rows);
        log::debug!(
            "filter {:?}: {} rows, {} rentals",
            criteria,
            rows.len(),
            total
        );

        DashboardView {
            total,
            revenue: aggregate::estimated_revenue(total),
            daily: aggregate::daily_series(rows),
            hourly: aggregate::hourly_average(store.hourly()),
            dual: aggregate::dual_series(rows),
            scatter: aggregate::temperature_scatter(rows),
            outcome,
        }
    }

    pub fn has_rows(&self) -> bool {
        matches!(self.outcome, FilterOutcome::Rows(_))
    }
}
