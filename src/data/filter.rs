use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::error::ValidationError;
use super::model::{DailyRecord, RecordStore, Season, YearIndicator};

// ---------------------------------------------------------------------------
// Filter criteria: the user's current selection
// ---------------------------------------------------------------------------

/// Year, inclusive date range and season subset selected in the side panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub year: YearIndicator,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub seasons: BTreeSet<Season>,
}

impl FilterCriteria {
    /// Initial selection: first year in the table, its full date span and
    /// every season present. `None` when there are no daily rows.
    pub fn full_range(store: &RecordStore) -> Option<Self> {
        let (start, end) = store.date_bounds()?;
        let year = *store.years().first()?;
        Some(FilterCriteria {
            year,
            start,
            end,
            seasons: store.seasons(),
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.start > self.end {
            return Err(ValidationError::InvalidDateRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Whether a single record passes all three predicates.
    pub fn matches(&self, record: &DailyRecord) -> bool {
        record.year == self.year
            && self.seasons.contains(&record.season)
            && self.start <= record.date
            && record.date <= self.end
    }
}

/// Return indices of daily records that pass the criteria, in input order.
///
/// * `start > end` → [`ValidationError::InvalidDateRange`], no rows at all
/// * empty season set → `Ok` with no indices
pub fn filtered_indices(
    records: &[DailyRecord],
    criteria: &FilterCriteria,
) -> Result<Vec<usize>, ValidationError> {
    criteria.validate()?;
    Ok(records
        .iter()
        .enumerate()
        .filter(|(_, rec)| criteria.matches(rec))
        .map(|(i, _)| i)
        .collect())
}

/// Same as [`filtered_indices`] but returns the matching records.
pub fn filter(
    records: &[DailyRecord],
    criteria: &FilterCriteria,
) -> Result<Vec<DailyRecord>, ValidationError> {
    let indices = filtered_indices(records, criteria)?;
    Ok(indices.into_iter().map(|i| records[i]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::WeatherSituation;
    use chrono::Datelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rec(date: NaiveDate, season: Season, total: u32) -> DailyRecord {
        DailyRecord {
            date,
            year: YearIndicator::from_year(date.year()).unwrap(),
            season,
            weather: WeatherSituation(1),
            temperature: 0.25,
            casual: total / 4,
            registered: total - total / 4,
            total,
        }
    }

    fn criteria(start: NaiveDate, end: NaiveDate, seasons: &[Season]) -> FilterCriteria {
        FilterCriteria {
            year: YearIndicator::Y2012,
            start,
            end,
            seasons: seasons.iter().copied().collect(),
        }
    }

    fn sample() -> Vec<DailyRecord> {
        vec![
            rec(date(2011, 12, 31), Season::Winter, 70),
            rec(date(2012, 1, 1), Season::Winter, 100),
            rec(date(2012, 1, 2), Season::Spring, 50),
            rec(date(2012, 1, 3), Season::Winter, 80),
            rec(date(2012, 6, 1), Season::Summer, 300),
        ]
    }

    #[test]
    fn selects_year_season_and_range() {
        let records = sample();
        let c = criteria(date(2012, 1, 1), date(2012, 1, 2), &[Season::Winter]);
        let out = filter(&records, &c).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].date, date(2012, 1, 1));
        assert_eq!(out[0].total, 100);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let records = sample();
        let c = criteria(date(2012, 1, 1), date(2012, 1, 3), &Season::ALL);
        let idx = filtered_indices(&records, &c).unwrap();
        assert_eq!(idx, vec![1, 2, 3]);
    }

    #[test]
    fn other_year_is_excluded_even_inside_range() {
        let records = sample();
        let c = criteria(date(2011, 1, 1), date(2012, 12, 31), &[Season::Winter]);
        let out = filter(&records, &c).unwrap();
        assert!(out.iter().all(|r| r.year == YearIndicator::Y2012));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn reversed_range_is_a_validation_error() {
        let records = sample();
        let c = criteria(date(2012, 2, 1), date(2012, 1, 1), &Season::ALL);
        assert_eq!(
            filter(&records, &c),
            Err(ValidationError::InvalidDateRange {
                start: date(2012, 2, 1),
                end: date(2012, 1, 1),
            })
        );
    }

    #[test]
    fn empty_season_set_is_empty_not_error() {
        let records = sample();
        let c = criteria(date(2012, 1, 1), date(2012, 12, 31), &[]);
        assert_eq!(filter(&records, &c), Ok(Vec::new()));
    }

    #[test]
    fn single_day_range() {
        let records = sample();
        let c = criteria(date(2012, 6, 1), date(2012, 6, 1), &Season::ALL);
        assert_eq!(filtered_indices(&records, &c).unwrap(), vec![4]);
    }

    #[test]
    fn result_is_exact_subset_in_input_order() {
        let records = sample();
        let c = criteria(date(2011, 6, 1), date(2012, 12, 31), &[Season::Winter, Season::Summer]);
        let idx = filtered_indices(&records, &c).unwrap();
        let expected: Vec<usize> = (0..records.len()).filter(|&i| c.matches(&records[i])).collect();
        assert_eq!(idx, expected);
        assert!(idx.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn full_range_defaults() {
        let store = RecordStore::new(sample(), Vec::new());
        let c = FilterCriteria::full_range(&store).unwrap();
        assert_eq!(c.year, YearIndicator::Y2011);
        assert_eq!(c.start, date(2011, 12, 31));
        assert_eq!(c.end, date(2012, 6, 1));
        assert_eq!(c.seasons.len(), 3);
        assert!(FilterCriteria::full_range(&RecordStore::default()).is_none());
    }
}
