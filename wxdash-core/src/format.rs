//! Display-string helpers shared by every presenter.
//!
//! All functions are pure; the callers decide which time zone the
//! `DateTime` values carry.

use chrono::{DateTime, TimeZone};
use std::fmt;

const ICON_HOST: &str = "https://openweathermap.org";

/// Long-form header line, e.g. "Tuesday, November 14, 2023, 10:13 PM".
pub fn long_date_time<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    at.format("%A, %B %-d, %Y, %I:%M %p").to_string()
}

/// Short weekday abbreviation, e.g. "Tue".
pub fn day_name<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    at.format("%a").to_string()
}

/// Forecast-card date, e.g. "Nov 14".
pub fn short_date<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    at.format("%b %-d").to_string()
}

/// Fully qualified icon image URL for an upstream icon code.
pub fn icon_url(code: &str) -> String {
    format!("{ICON_HOST}/img/wn/{code}@4x.png")
}

/// Rounds half away from zero; the same rule is used at every call site.
pub fn round_temp(celsius: f64) -> i32 {
    celsius.round() as i32
}

/// Visibility in kilometres with one decimal, e.g. "10.0 km".
pub fn visibility_km(meters: f64) -> String {
    format!("{:.1} km", meters / 1000.0)
}
