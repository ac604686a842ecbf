//! Data layer: record types, loading, filtering and aggregation.
//!
//! Architecture:
//! ```text
//!  day.csv / hour.csv (.json / .parquet)
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse files → RecordStore
//!   └──────────┘
//!        │
//!        ▼
//!   ┌─────────────┐
//!   │ RecordStore  │  Vec<DailyRecord>, Vec<HourlyRecord>
//!   └─────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  year / date range / seasons → filtered daily rows
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ aggregate  │  totals, per-date sums, per-hour means
//!   └───────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │   view    │  DashboardView handed to the UI
//!   └──────────┘
//! ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod view;
