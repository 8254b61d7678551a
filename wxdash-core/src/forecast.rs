//! Collapses the upstream 3-hour forecast slots into one entry per day.

use chrono::{NaiveDate, TimeZone, Timelike};

use crate::model::{DailyForecast, ForecastEntry};

/// Local-hour window treated as "midday"; a slot in this window represents
/// its day better than whatever arrived first.
const MIDDAY_START: u32 = 11;
const MIDDAY_END: u32 = 14;

/// How many days the dashboard shows after today.
pub const FORECAST_DAYS: usize = 5;

/// Picks one representative slot per calendar date (dates taken in `tz`),
/// drops the earliest date as "today" and returns up to [`FORECAST_DAYS`]
/// of the rest, in order of first appearance.
///
/// The first slot seen for a date is the default representative; any later
/// slot for the same date whose local hour falls in the midday window
/// replaces it. Fewer than six distinct dates simply yield fewer results.
pub fn reduce_daily<Tz: TimeZone>(entries: &[ForecastEntry], tz: &Tz) -> Vec<DailyForecast> {
    let mut days: Vec<(NaiveDate, &ForecastEntry)> = Vec::new();

    for entry in entries {
        let local = entry.at.with_timezone(tz);
        let date = local.date_naive();
        let hour = local.hour();

        match days.iter().position(|(d, _)| *d == date) {
            None => days.push((date, entry)),
            Some(i) if (MIDDAY_START..=MIDDAY_END).contains(&hour) => days[i].1 = entry,
            Some(_) => {}
        }
    }

    days.into_iter()
        .skip(1)
        .take(FORECAST_DAYS)
        .map(|(date, entry)| DailyForecast {
            date,
            at: entry.at,
            temp_min_c: entry.temp_min_c,
            temp_max_c: entry.temp_max_c,
            description: entry.description.clone(),
            icon: entry.icon.clone(),
        })
        .collect()
}
