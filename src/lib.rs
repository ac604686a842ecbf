//! Filtering and aggregation core for the bike-sharing rental dashboard.
//!
//! The display layer lives in the `bike-dash` binary; everything here is
//! plain data in, plain data out.

pub mod data;
