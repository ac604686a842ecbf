use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Season – categorical season code (1..=4)
// ---------------------------------------------------------------------------

/// Meteorological season as encoded in the rental tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Season {
    Spring = 1,
    Summer = 2,
    Fall = 3,
    Winter = 4,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    /// Integer code used in the source tables.
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

impl TryFrom<u8> for Season {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Season::Spring),
            2 => Ok(Season::Summer),
            3 => Ok(Season::Fall),
            4 => Ok(Season::Winter),
            other => Err(format!("unknown season code {other}")),
        }
    }
}

impl From<Season> for u8 {
    fn from(season: Season) -> u8 {
        season.code()
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.label())
    }
}

// ---------------------------------------------------------------------------
// YearIndicator – 0/1 flag mapped onto a real calendar year
// ---------------------------------------------------------------------------

/// The dataset covers exactly two years, stored as a 0/1 indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum YearIndicator {
    Y2011 = 0,
    Y2012 = 1,
}

impl YearIndicator {
    pub const BASE_YEAR: i32 = 2011;

    pub fn year(self) -> i32 {
        Self::BASE_YEAR + self as i32
    }

    pub fn from_year(year: i32) -> Option<Self> {
        match year - Self::BASE_YEAR {
            0 => Some(YearIndicator::Y2011),
            1 => Some(YearIndicator::Y2012),
            _ => None,
        }
    }
}

impl TryFrom<u8> for YearIndicator {
    type Error = String;

    fn try_from(flag: u8) -> Result<Self, Self::Error> {
        match flag {
            0 => Ok(YearIndicator::Y2011),
            1 => Ok(YearIndicator::Y2012),
            other => Err(format!("year indicator must be 0 or 1, got {other}")),
        }
    }
}

impl From<YearIndicator> for u8 {
    fn from(year: YearIndicator) -> u8 {
        year as u8
    }
}

impl fmt::Display for YearIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.year())
    }
}

// ---------------------------------------------------------------------------
// WeatherSituation – categorical weather code
// ---------------------------------------------------------------------------

/// Weather situation code. Known codes are 1..=4; anything else is carried
/// through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherSituation(pub u8);

impl WeatherSituation {
    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Clear / partly cloudy",
            2 => "Mist / cloudy",
            3 => "Light snow or rain",
            4 => "Heavy rain, ice or fog",
            _ => "Other",
        }
    }
}

impl fmt::Display for WeatherSituation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.label())
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One row of the daily table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    #[serde(rename = "dteday")]
    pub date: NaiveDate,
    #[serde(rename = "yr")]
    pub year: YearIndicator,
    pub season: Season,
    #[serde(rename = "weathersit")]
    pub weather: WeatherSituation,
    /// Normalised temperature.
    #[serde(rename = "temp")]
    pub temperature: f64,
    pub casual: u32,
    pub registered: u32,
    /// Always `casual + registered` (checked by the loader).
    #[serde(rename = "cnt")]
    pub total: u32,
}

/// One row of the hourly table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyRecord {
    #[serde(rename = "dteday")]
    pub date: NaiveDate,
    #[serde(rename = "hr")]
    pub hour: u8,
    #[serde(rename = "cnt")]
    pub total: u32,
}

// ---------------------------------------------------------------------------
// RecordStore – both tables, loaded once
// ---------------------------------------------------------------------------

/// Owns the daily and hourly tables for the lifetime of the process.
/// Nothing mutates the tables once the store is built.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    daily: Vec<DailyRecord>,
    hourly: Vec<HourlyRecord>,
}

impl RecordStore {
    pub fn new(daily: Vec<DailyRecord>, hourly: Vec<HourlyRecord>) -> Self {
        RecordStore { daily, hourly }
    }

    pub fn daily(&self) -> &[DailyRecord] {
        &self.daily
    }

    pub fn hourly(&self) -> &[HourlyRecord] {
        &self.hourly
    }

    /// Earliest and latest date in the daily table.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.daily.iter().map(|r| r.date).min()?;
        let max = self.daily.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    /// Distinct year indicators in first-seen order.
    pub fn years(&self) -> Vec<YearIndicator> {
        let mut years = Vec::new();
        for rec in &self.daily {
            if !years.contains(&rec.year) {
                years.push(rec.year);
            }
        }
        years
    }

    /// Distinct seasons present in the daily table.
    pub fn seasons(&self) -> BTreeSet<Season> {
        self.daily.iter().map(|r| r.season).collect()
    }

    /// Replace the daily table, keeping the hourly one.
    pub fn with_daily(self, daily: Vec<DailyRecord>) -> Self {
        RecordStore { daily, ..self }
    }

    /// Replace the hourly table, keeping the daily one.
    pub fn with_hourly(self, hourly: Vec<HourlyRecord>) -> Self {
        RecordStore { hourly, ..self }
    }
}
