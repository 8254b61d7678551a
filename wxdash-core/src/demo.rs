//! Bundled sample data shown when live requests fail during startup.

use chrono::{Duration, Utc};

use crate::model::{CurrentConditions, DailyForecast};

/// Sample "now" snapshot.
pub fn current_conditions() -> CurrentConditions {
    CurrentConditions {
        city: "Colombo".to_string(),
        country: "LK".to_string(),
        observed_at: Utc::now(),
        temperature_c: 28.0,
        feels_like_c: 32.0,
        humidity_pct: 78,
        description: "scattered clouds".to_string(),
        icon: "03d".to_string(),
        wind_speed_mps: 3.5,
        visibility_m: 10_000.0,
    }
}

/// Five synthetic days starting tomorrow. Already day-level, so they go
/// straight to the presenter without passing through the reducer.
pub fn daily_forecasts() -> Vec<DailyForecast> {
    let days = [
        (26.0, 31.0, "sunny", "01d"),
        (25.0, 29.0, "light rain", "10d"),
        (26.0, 30.0, "cloudy", "04d"),
        (27.0, 32.0, "sunny", "01d"),
        (26.0, 31.0, "partly cloudy", "02d"),
    ];

    let now = Utc::now();

    days.iter()
        .enumerate()
        .map(|(i, (min, max, description, icon))| {
            let at = now + Duration::days(i as i64 + 1);
            DailyForecast {
                date: at.date_naive(),
                at,
                temp_min_c: *min,
                temp_max_c: *max,
                description: (*description).to_string(),
                icon: (*icon).to_string(),
            }
        })
        .collect()
}
