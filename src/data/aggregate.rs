use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::model::{DailyRecord, HourlyRecord, WeatherSituation};

/// Flat fee per rental used for the revenue metric (USD).
pub const FEE_PER_RENTAL: u64 = 2;

// ---------------------------------------------------------------------------
// Output rows
// ---------------------------------------------------------------------------

/// Summed rentals for one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: u64,
}

/// Mean rentals for one hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourlyMean {
    pub hour: u8,
    pub mean: f64,
}

/// Casual and registered rentals for one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiderSplit {
    pub date: NaiveDate,
    pub casual: u64,
    pub registered: u64,
}

/// One point of the temperature-vs-rentals scatter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperaturePoint {
    pub temperature: f64,
    pub total: u32,
    pub weather: WeatherSituation,
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Sum of `total` over the records; 0 for no records.
pub fn total_count(records: &[DailyRecord]) -> u64 {
    records.iter().map(|r| u64::from(r.total)).sum()
}

/// Revenue estimate for a rental count.
pub fn estimated_revenue(total: u64) -> u64 {
    total * FEE_PER_RENTAL
}

/// Rentals summed per date, ascending. Dates without records are absent.
pub fn daily_series(records: &[DailyRecord]) -> Vec<DailyTotal> {
    let mut by_date: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for rec in records {
        *by_date.entry(rec.date).or_default() += u64::from(rec.total);
    }
    by_date
        .into_iter()
        .map(|(date, total)| DailyTotal { date, total })
        .collect()
}

/// Mean rentals per hour of day across every date in `records`.
/// Hours with no records are omitted.
pub fn hourly_average(records: &[HourlyRecord]) -> Vec<HourlyMean> {
    let mut by_hour: BTreeMap<u8, (u64, u64)> = BTreeMap::new();
    for rec in records {
        let (sum, n) = by_hour.entry(rec.hour).or_default();
        *sum += u64::from(rec.total);
        *n += 1;
    }
    by_hour
        .into_iter()
        .map(|(hour, (sum, n))| HourlyMean {
            hour,
            mean: sum as f64 / n as f64,
        })
        .collect()
}

/// Casual vs registered rentals per date, ascending.
///
/// The daily table holds one row per date so this is normally a pass-through,
/// but duplicate dates are summed rather than emitted twice.
pub fn dual_series(records: &[DailyRecord]) -> Vec<RiderSplit> {
    let mut by_date: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();
    for rec in records {
        let (casual, registered) = by_date.entry(rec.date).or_default();
        *casual += u64::from(rec.casual);
        *registered += u64::from(rec.registered);
    }
    by_date
        .into_iter()
        .map(|(date, (casual, registered))| RiderSplit {
            date,
            casual,
            registered,
        })
        .collect()
}

/// Temperature against total rentals, one point per record in input order.
pub fn temperature_scatter(records: &[DailyRecord]) -> Vec<TemperaturePoint> {
    records
        .iter()
        .map(|r| TemperaturePoint {
            temperature: r.temperature,
            total: r.total,
            weather: r.weather,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Season, YearIndicator};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rec(date: NaiveDate, casual: u32, registered: u32) -> DailyRecord {
        DailyRecord {
            date,
            year: YearIndicator::Y2012,
            season: Season::Winter,
            weather: WeatherSituation(2),
            temperature: 0.4,
            casual,
            registered,
            total: casual + registered,
        }
    }

    fn hr(d: NaiveDate, hour: u8, total: u32) -> HourlyRecord {
        HourlyRecord {
            date: d,
            hour,
            total,
        }
    }

    #[test]
    fn totals() {
        assert_eq!(total_count(&[]), 0);
        let records = [rec(date(2012, 1, 1), 20, 80), rec(date(2012, 1, 2), 10, 40)];
        assert_eq!(total_count(&records), 150);
        assert_eq!(estimated_revenue(150), 300);
    }

    #[test]
    fn daily_series_groups_and_sorts() {
        let records = [
            rec(date(2012, 1, 3), 1, 2),
            rec(date(2012, 1, 1), 10, 20),
            rec(date(2012, 1, 3), 4, 5),
        ];
        let series = daily_series(&records);
        assert_eq!(
            series,
            vec![
                DailyTotal { date: date(2012, 1, 1), total: 30 },
                DailyTotal { date: date(2012, 1, 3), total: 12 },
            ]
        );
        let summed: u64 = series.iter().map(|p| p.total).sum();
        assert_eq!(summed, total_count(&records));
    }

    #[test]
    fn daily_series_has_no_zero_fill() {
        let records = [rec(date(2012, 1, 1), 1, 1), rec(date(2012, 1, 10), 1, 1)];
        assert_eq!(daily_series(&records).len(), 2);
    }

    #[test]
    fn hourly_average_is_mean_per_hour() {
        let d1 = date(2011, 1, 1);
        let d2 = date(2011, 1, 2);
        let records = [hr(d1, 8, 100), hr(d2, 8, 300), hr(d1, 0, 5), hr(d2, 23, 7)];
        let avg = hourly_average(&records);
        assert_eq!(
            avg,
            vec![
                HourlyMean { hour: 0, mean: 5.0 },
                HourlyMean { hour: 8, mean: 200.0 },
                HourlyMean { hour: 23, mean: 7.0 },
            ]
        );
    }

    #[test]
    fn hourly_average_bounded_to_24_hours() {
        let d = date(2011, 1, 1);
        let records: Vec<HourlyRecord> = (0..3)
            .flat_map(|k| (0..24u8).map(move |h| hr(d, h, k * 10 + u32::from(h))))
            .collect();
        let avg = hourly_average(&records);
        assert_eq!(avg.len(), 24);
        assert!(avg.iter().all(|m| m.hour <= 23 && m.mean >= 0.0));
    }

    #[test]
    fn dual_series_orders_by_date() {
        let records = [rec(date(2012, 1, 2), 3, 30), rec(date(2012, 1, 1), 5, 50)];
        assert_eq!(
            dual_series(&records),
            vec![
                RiderSplit { date: date(2012, 1, 1), casual: 5, registered: 50 },
                RiderSplit { date: date(2012, 1, 2), casual: 3, registered: 30 },
            ]
        );
    }

    #[test]
    fn empty_inputs_give_empty_outputs() {
        assert!(daily_series(&[]).is_empty());
        assert!(hourly_average(&[]).is_empty());
        assert!(dual_series(&[]).is_empty());
        assert!(temperature_scatter(&[]).is_empty());
    }

    #[test]
    fn scatter_keeps_input_order() {
        let records = [rec(date(2012, 1, 2), 3, 30), rec(date(2012, 1, 1), 5, 50)];
        let pts = temperature_scatter(&records);
        assert_eq!(pts[0].total, 33);
        assert_eq!(pts[1].total, 55);
        assert_eq!(pts[0].weather, WeatherSituation(2));
    }
}
