use std::f64::consts::PI;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Date32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate};
use parquet::arrow::ArrowWriter;
use serde::Serialize;

use bike_dash::data::model::{
    DailyRecord, HourlyRecord, Season, WeatherSituation, YearIndicator,
};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

fn season_of(date: NaiveDate) -> Season {
    match date.month() {
        1..=3 => Season::Spring,
        4..=6 => Season::Summer,
        7..=9 => Season::Fall,
        _ => Season::Winter,
    }
}

fn weather_draw(rng: &mut SimpleRng) -> WeatherSituation {
    let u = rng.next_f64();
    WeatherSituation(if u < 0.63 {
        1
    } else if u < 0.96 {
        2
    } else if u < 0.995 {
        3
    } else {
        4
    })
}

/// Share of a day's rentals falling in each hour: commute peaks at 08 and 17-18.
fn hourly_profile() -> [f64; 24] {
    let mut weights = [0.0; 24];
    for (h, w) in weights.iter_mut().enumerate() {
        let h = h as f64;
        let morning = 1.6 * (-(h - 8.0).powi(2) / 2.0).exp();
        let evening = 2.0 * (-(h - 17.5).powi(2) / 3.0).exp();
        let daytime = 0.6 * (-(h - 13.0).powi(2) / 18.0).exp();
        *w = 0.02 + morning + evening + daytime;
    }
    let sum: f64 = weights.iter().sum();
    weights.map(|w| w / sum)
}

fn generate(rng: &mut SimpleRng) -> (Vec<DailyRecord>, Vec<HourlyRecord>) {
    let profile = hourly_profile();
    let mut daily = Vec::new();
    let mut hourly = Vec::new();

    for year in [YearIndicator::Y2011, YearIndicator::Y2012] {
        let days_in_year = if year.year() % 4 == 0 { 366 } else { 365 };
        for ordinal in 1..=days_in_year {
            let Some(date) = NaiveDate::from_yo_opt(year.year(), ordinal) else {
                continue;
            };
            let phase = 2.0 * PI * (f64::from(ordinal) - 105.0) / f64::from(days_in_year);
            let temperature = (0.5 + 0.3 * phase.sin() + rng.gauss(0.0, 0.05)).clamp(0.05, 0.95);
            let weather = weather_draw(rng);

            let growth = if year == YearIndicator::Y2012 { 1.6 } else { 1.0 };
            let weather_factor = match weather.0 {
                1 => 1.0,
                2 => 0.85,
                3 => 0.45,
                _ => 0.2,
            };
            let level = growth * weather_factor * (1500.0 + 5500.0 * temperature);
            let casual_share = (0.1 + 0.25 * temperature + rng.gauss(0.0, 0.03)).clamp(0.02, 0.5);
            let total = rng.gauss(level, level * 0.08).max(20.0);
            let casual = (total * casual_share).round() as u32;
            let registered = (total * (1.0 - casual_share)).round() as u32;

            daily.push(DailyRecord {
                date,
                year,
                season: season_of(date),
                weather,
                temperature: (temperature * 1e6).round() / 1e6,
                casual,
                registered,
                total: casual + registered,
            });

            for (hour, share) in profile.iter().enumerate() {
                let expected = f64::from(casual + registered) * share;
                hourly.push(HourlyRecord {
                    date,
                    hour: hour as u8,
                    total: rng.gauss(expected, expected.sqrt()).max(0.0).round() as u32,
                });
            }
        }
    }
    (daily, hourly)
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(batch)?;
    writer.close()?;
    Ok(())
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    const UNIX_EPOCH_CE: i32 = 719_163;
    date.num_days_from_ce() - UNIX_EPOCH_CE
}

fn daily_batch(rows: &[DailyRecord]) -> Result<RecordBatch> {
    let int = |f: fn(&DailyRecord) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let schema = Arc::new(Schema::new(vec![
        Field::new("dteday", DataType::Date32, false),
        Field::new("season", DataType::Int32, false),
        Field::new("yr", DataType::Int32, false),
        Field::new("weathersit", DataType::Int32, false),
        Field::new("temp", DataType::Float64, false),
        Field::new("casual", DataType::Int64, false),
        Field::new("registered", DataType::Int64, false),
        Field::new("cnt", DataType::Int64, false),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Date32Array::from(
            rows.iter().map(|r| days_since_epoch(r.date)).collect::<Vec<_>>(),
        )),
        Arc::new(Int32Array::from(
            rows.iter().map(|r| i32::from(r.season.code())).collect::<Vec<_>>(),
        )),
        Arc::new(Int32Array::from(
            rows.iter().map(|r| i32::from(u8::from(r.year))).collect::<Vec<_>>(),
        )),
        Arc::new(Int32Array::from(
            rows.iter().map(|r| i32::from(r.weather.0)).collect::<Vec<_>>(),
        )),
        Arc::new(Float64Array::from(
            rows.iter().map(|r| r.temperature).collect::<Vec<_>>(),
        )),
        int(|r| i64::from(r.casual)),
        int(|r| i64::from(r.registered)),
        int(|r| i64::from(r.total)),
    ];
    Ok(RecordBatch::try_new(schema, columns)?)
}

fn hourly_batch(rows: &[HourlyRecord]) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("dteday", DataType::Date32, false),
        Field::new("hr", DataType::Int32, false),
        Field::new("cnt", DataType::Int64, false),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Date32Array::from(
            rows.iter().map(|r| days_since_epoch(r.date)).collect::<Vec<_>>(),
        )),
        Arc::new(Int32Array::from(
            rows.iter().map(|r| i32::from(r.hour)).collect::<Vec<_>>(),
        )),
        Arc::new(Int64Array::from(
            rows.iter().map(|r| i64::from(r.total)).collect::<Vec<_>>(),
        )),
    ];
    Ok(RecordBatch::try_new(schema, columns)?)
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("main_data"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let (daily, hourly) = generate(&mut rng);

    write_csv(&out_dir.join("day_cleaned_final.csv"), &daily)?;
    write_csv(&out_dir.join("hour_cleaned_final.csv"), &hourly)?;
    write_parquet(&out_dir.join("day_cleaned_final.parquet"), &daily_batch(&daily)?)?;
    write_parquet(&out_dir.join("hour_cleaned_final.parquet"), &hourly_batch(&hourly)?)?;

    log::info!("wrote sample tables to {}", out_dir.display());
    println!(
        "Wrote {} daily and {} hourly records to {}",
        daily.len(),
        hourly.len(),
        out_dir.display()
    );
    Ok(())
}
