use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Date32Type, Float64Type, Int64Type};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::de::DeserializeOwned;

use super::model::{
    DailyRecord, HourlyRecord, RecordStore, Season, WeatherSituation, YearIndicator,
};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load both tables and build the store.
pub fn load_store(daily_path: &Path, hourly_path: &Path) -> Result<RecordStore> {
    let daily = load_daily(daily_path)
        .with_context(|| format!("loading daily table {}", daily_path.display()))?;
    let hourly = load_hourly(hourly_path)
        .with_context(|| format!("loading hourly table {}", hourly_path.display()))?;
    log::info!(
        "Loaded {} daily and {} hourly records",
        daily.len(),
        hourly.len()
    );
    Ok(RecordStore::new(daily, hourly))
}

pub fn load_daily(path: &Path) -> Result<Vec<DailyRecord>> {
    load_table(path)
}

pub fn load_hourly(path: &Path) -> Result<Vec<HourlyRecord>> {
    load_table(path)
}

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the dataset's column names (`dteday`, `cnt`, …)
/// * `.json`    – records-oriented array, `df.to_json(orient='records')`
/// * `.parquet` – flat columns; integers of any width, `dteday` as string or date
pub fn load_table<T: TableRow>(path: &Path) -> Result<Vec<T>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            read_csv(file)?
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            read_json(&text)?
        }
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };
    log::debug!("{}: {} {} rows", path.display(), rows.len(), T::KIND);
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A record type that can be read from any supported table format.
pub trait TableRow: DeserializeOwned + Sized {
    /// Human-readable table name for messages.
    const KIND: &'static str;

    /// Reject rows that parse but break the table's invariants.
    fn check(&self, row: usize) -> Result<()>;

    /// Decode every row of an Arrow record batch.
    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>>;
}

impl TableRow for DailyRecord {
    const KIND: &'static str = "daily";

    fn check(&self, row: usize) -> Result<()> {
        let sum = u64::from(self.casual) + u64::from(self.registered);
        if u64::from(self.total) != sum {
            bail!(
                "Row {row}: cnt is {} but casual + registered is {sum}",
                self.total
            );
        }
        Ok(())
    }

    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        let dates = date_column(batch, "dteday")?;
        let years = int_column(batch, "yr")?;
        let seasons = int_column(batch, "season")?;
        let weather = int_column(batch, "weathersit")?;
        let temps = float_column(batch, "temp")?;
        let casual = int_column(batch, "casual")?;
        let registered = int_column(batch, "registered")?;
        let totals = int_column(batch, "cnt")?;

        (0..batch.num_rows())
            .map(|i| -> Result<Self> {
                let year = YearIndicator::try_from(narrow::<u8>(years[i], i, "yr")?)
                    .map_err(|e| anyhow!("Row {i}: {e}"))?;
                let season = Season::try_from(narrow::<u8>(seasons[i], i, "season")?)
                    .map_err(|e| anyhow!("Row {i}: {e}"))?;
                Ok(DailyRecord {
                    date: dates[i],
                    year,
                    season,
                    weather: WeatherSituation(narrow(weather[i], i, "weathersit")?),
                    temperature: temps[i],
                    casual: narrow(casual[i], i, "casual")?,
                    registered: narrow(registered[i], i, "registered")?,
                    total: narrow(totals[i], i, "cnt")?,
                })
            })
            .collect()
    }
}

impl TableRow for HourlyRecord {
    const KIND: &'static str = "hourly";

    fn check(&self, row: usize) -> Result<()> {
        if self.hour > 23 {
            bail!("Row {row}: hr must be within 0..=23, got {}", self.hour);
        }
        Ok(())
    }

    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        let dates = date_column(batch, "dteday")?;
        let hours = int_column(batch, "hr")?;
        let totals = int_column(batch, "cnt")?;

        (0..batch.num_rows())
            .map(|i| -> Result<Self> {
                Ok(HourlyRecord {
                    date: dates[i],
                    hour: narrow(hours[i], i, "hr")?,
                    total: narrow(totals[i], i, "cnt")?,
                })
            })
            .collect()
    }
}

fn narrow<N: TryFrom<i64>>(value: i64, row: usize, col: &str) -> Result<N> {
    N::try_from(value).map_err(|_| anyhow!("Row {row}, {col}: {value} is out of range"))
}

fn check_all<T: TableRow>(rows: &[T]) -> Result<()> {
    rows.iter().enumerate().try_for_each(|(i, r)| r.check(i))
}

// ---------------------------------------------------------------------------
// CSV / JSON
// ---------------------------------------------------------------------------

/// Parse CSV with a header row. Extra columns in the file are ignored.
pub fn read_csv<T: TableRow, R: Read>(source: R) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_reader(source);
    let mut rows = Vec::new();
    for (row_no, result) in reader.deserialize::<T>().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        row.check(row_no)?;
        rows.push(row);
    }
    Ok(rows)
}

/// Parse a records-oriented JSON array.
pub fn read_json<T: TableRow>(text: &str) -> Result<Vec<T>> {
    let rows: Vec<T> = serde_json::from_str(text).context("parsing JSON")?;
    check_all(&rows)?;
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

fn load_parquet<T: TableRow>(path: &Path) -> Result<Vec<T>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let offset = rows.len();
        let decoded = T::from_batch(&batch)
            .with_context(|| format!("decoding batch starting at row {offset}"))?;
        for (i, row) in decoded.iter().enumerate() {
            row.check(offset + i)?;
        }
        rows.extend(decoded);
    }
    Ok(rows)
}

// -- Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .with_context(|| format!("Parquet file missing '{name}' column"))
}

/// Any integer column, widened to `i64`.
fn int_column(batch: &RecordBatch, name: &str) -> Result<Vec<i64>> {
    let widened = cast(column(batch, name)?, &DataType::Int64)
        .with_context(|| format!("column '{name}' is not integer"))?;
    widened
        .as_primitive::<Int64Type>()
        .iter()
        .enumerate()
        .map(|(i, v)| v.with_context(|| format!("Row {i}: null in '{name}'")))
        .collect()
}

fn float_column(batch: &RecordBatch, name: &str) -> Result<Vec<f64>> {
    let widened = cast(column(batch, name)?, &DataType::Float64)
        .with_context(|| format!("column '{name}' is not numeric"))?;
    widened
        .as_primitive::<Float64Type>()
        .iter()
        .enumerate()
        .map(|(i, v)| v.with_context(|| format!("Row {i}: null in '{name}'")))
        .collect()
}

/// Date column stored as `YYYY-MM-DD` text, Date32 or a timestamp.
fn date_column(batch: &RecordBatch, name: &str) -> Result<Vec<NaiveDate>> {
    let dates = cast(column(batch, name)?, &DataType::Date32)
        .with_context(|| format!("column '{name}' is not a date"))?;
    let dates = dates.as_primitive::<Date32Type>();
    (0..dates.len())
        .map(|i| -> Result<NaiveDate> {
            if dates.is_null(i) {
                bail!("Row {i}: null in '{name}'");
            }
            dates
                .value_as_date(i)
                .with_context(|| format!("Row {i}: '{name}' out of range"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int32Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    use super::*;

    const DAY_CSV: &str = "\
instant,dteday,season,yr,mnth,weathersit,temp,casual,registered,cnt
1,2011-01-01,1,0,1,2,0.344167,331,654,985
2,2011-01-02,1,0,1,2,0.363478,131,670,801
";

    const HOUR_CSV: &str = "\
dteday,hr,cnt
2011-01-01,0,16
2011-01-01,1,40
";

    #[test]
    fn csv_daily_ignores_extra_columns() {
        let rows: Vec<DailyRecord> = read_csv(DAY_CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2011, 1, 1).unwrap());
        assert_eq!(rows[0].year, YearIndicator::Y2011);
        assert_eq!(rows[0].season, Season::Spring);
        assert_eq!(rows[0].weather, WeatherSituation(2));
        assert_eq!(rows[1].total, 801);
    }

    #[test]
    fn csv_hourly() {
        let rows: Vec<HourlyRecord> = read_csv(HOUR_CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].hour, 1);
        assert_eq!(rows[1].total, 40);
    }

    #[test]
    fn csv_rejects_broken_total() {
        let csv = "dteday,season,yr,weathersit,temp,casual,registered,cnt\n\
                   2011-01-01,1,0,1,0.3,10,10,25\n";
        let err = read_csv::<DailyRecord, _>(csv.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("casual + registered"));
    }

    #[test]
    fn csv_rejects_unknown_season() {
        let csv = "dteday,season,yr,weathersit,temp,casual,registered,cnt\n\
                   2011-01-01,7,0,1,0.3,10,10,20\n";
        assert!(read_csv::<DailyRecord, _>(csv.as_bytes()).is_err());
    }

    #[test]
    fn hour_out_of_range_is_rejected() {
        let csv = "dteday,hr,cnt\n2011-01-01,24,3\n";
        let err = read_csv::<HourlyRecord, _>(csv.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("0..=23"));
    }

    #[test]
    fn json_records() {
        let text = r#"[
            {"dteday": "2012-01-01", "yr": 1, "season": 4, "weathersit": 1,
             "temp": 0.2, "casual": 40, "registered": 60, "cnt": 100}
        ]"#;
        let rows: Vec<DailyRecord> = read_json(text).unwrap();
        assert_eq!(rows[0].year, YearIndicator::Y2012);
        assert_eq!(rows[0].season, Season::Winter);
    }

    #[test]
    fn unsupported_extension() {
        let err = load_daily(Path::new("day.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }

    #[test]
    fn load_store_from_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        let day = dir.path().join("day.csv");
        let hour = dir.path().join("hour.csv");
        std::fs::write(&day, DAY_CSV).unwrap();
        std::fs::write(&hour, HOUR_CSV).unwrap();

        let store = load_store(&day, &hour).unwrap();
        assert_eq!(store.daily().len(), 2);
        assert_eq!(store.hourly().len(), 2);
    }

    #[test]
    fn parquet_with_string_dates_and_narrow_ints() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("dteday", DataType::Utf8, false),
            Field::new("yr", DataType::Int32, false),
            Field::new("season", DataType::Int32, false),
            Field::new("weathersit", DataType::Int32, false),
            Field::new("temp", DataType::Float64, false),
            Field::new("casual", DataType::Int64, false),
            Field::new("registered", DataType::Int64, false),
            Field::new("cnt", DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["2012-01-01", "2012-01-02"])),
                Arc::new(Int32Array::from(vec![1, 1])),
                Arc::new(Int32Array::from(vec![4, 1])),
                Arc::new(Int32Array::from(vec![1, 3])),
                Arc::new(Float64Array::from(vec![0.2, 0.1])),
                Arc::new(Int64Array::from(vec![30, 10])),
                Arc::new(Int64Array::from(vec![70, 40])),
                Arc::new(Int64Array::from(vec![100, 50])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("day.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let rows = load_daily(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2012, 1, 1).unwrap());
        assert_eq!(rows[0].season, Season::Winter);
        assert_eq!(rows[1].weather, WeatherSituation(3));
        assert_eq!(rows[1].total, 50);
    }

    #[test]
    fn parquet_missing_column() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("dteday", DataType::Utf8, false),
            Field::new("cnt", DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["2012-01-01"])),
                Arc::new(Int64Array::from(vec![5])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hour.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let err = load_hourly(&path).unwrap_err();
        assert!(format!("{err:#}").contains("'hr'"));
    }
}
