use std::ffi::OsString;
use std::path::PathBuf;

pub const DAY_ENV: &str = "BIKE_DASH_DAY";
pub const HOUR_ENV: &str = "BIKE_DASH_HOUR";

pub const DEFAULT_DAY: &str = "main_data/day_cleaned_final.csv";
pub const DEFAULT_HOUR: &str = "main_data/hour_cleaned_final.csv";

/// Where the two input tables are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub daily: PathBuf,
    pub hourly: PathBuf,
}

impl DataPaths {
    /// Positional arguments win, then environment variables, then defaults.
    ///
    /// `bike-dash [DAY] [HOUR]`
    pub fn resolve<I, E>(args: I, env: E) -> Self
    where
        I: IntoIterator<Item = OsString>,
        E: Fn(&str) -> Option<OsString>,
    {
        let mut args = args.into_iter();
        let mut pick = |var: &str, default: &str| {
            args.next()
                .or_else(|| env(var))
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        };
        let daily = pick(DAY_ENV, DEFAULT_DAY);
        let hourly = pick(HOUR_ENV, DEFAULT_HOUR);
        DataPaths { daily, hourly }
    }

    pub fn from_process() -> Self {
        Self::resolve(std::env::args_os().skip(1), |var| std::env::var_os(var))
    }
}
