use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single "now" snapshot for one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub city: String,
    pub country: String,
    pub observed_at: DateTime<Utc>,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub description: String,
    /// Upstream icon code, e.g. "03d".
    pub icon: String,
    pub wind_speed_mps: f64,
    pub visibility_m: f64,
}

/// One raw 3-hour forecast slot as delivered upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub at: DateTime<Utc>,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub description: String,
    pub icon: String,
}

/// Day-level representative derived from the 3-hour slots sharing one
/// calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    /// Timestamp of the slot that was picked to represent the day.
    pub at: DateTime<Utc>,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub description: String,
    pub icon: String,
}
