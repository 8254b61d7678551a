//! Terminal rendering of loading/error/result states.

use chrono::Local;
use wxdash_core::{CurrentConditions, DailyForecast, Presenter, format};

pub struct TerminalPresenter;

impl Presenter for TerminalPresenter {
    fn show_loading(&mut self) {
        println!("Fetching weather data...");
    }

    fn show_error(&mut self, message: &str) {
        eprintln!("Error: {message}");
    }

    fn show_result(&mut self, current: &CurrentConditions, daily: &[DailyForecast]) {
        let observed = current.observed_at.with_timezone(&Local);

        println!();
        println!("{}, {}", current.city, current.country);
        println!("{}", format::long_date_time(&observed));
        println!();
        println!("  {}°C  {}", format::round_temp(current.temperature_c), current.description);
        println!("  Feels like  {}°C", format::round_temp(current.feels_like_c));
        println!("  Humidity    {}%", current.humidity_pct);
        println!("  Wind        {} m/s", current.wind_speed_mps);
        println!("  Visibility  {}", format::visibility_km(current.visibility_m));

        if !daily.is_empty() {
            println!();
            println!("5-day forecast:");
            for day in daily {
                let at = day.at.with_timezone(&Local);
                println!(
                    "  {} {:<6}  {:>3}° / {:<3}°  {}",
                    format::day_name(&at),
                    format::short_date(&at),
                    format::round_temp(day.temp_max_c),
                    format::round_temp(day.temp_min_c),
                    day.description,
                );
            }
        }
        println!();
    }

    fn show_demo_notice(&mut self) {
        println!("Demo mode: live weather data is unavailable right now, showing bundled sample data.");
    }
}
