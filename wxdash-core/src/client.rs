use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

use crate::error::WeatherError;
use crate::model::{CurrentConditions, ForecastEntry};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// The two read-only calls a search needs. The orchestrator depends on this
/// trait, not on a concrete client.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    async fn current_conditions(&self, city: &str) -> Result<CurrentConditions, WeatherError>;

    async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, WeatherError>;
}

/// HTTP client for the OpenWeatherMap v2.5 endpoints.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client somewhere else, e.g. a mock server in tests.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    /// Issues one GET and decodes the body, reporting non-2xx statuses
    /// through `map_status`.
    async fn get_json<T, F>(&self, endpoint: &str, city: &str, map_status: F) -> Result<T, WeatherError>
    where
        T: DeserializeOwned,
        F: FnOnce(u16, String) -> WeatherError,
    {
        let url = format!("{}/{}", self.base_url, endpoint);

        tracing::debug!(endpoint, city, "requesting weather data");

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("units", "metric"), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|err| WeatherError::Upstream(err.to_string()))?;

        let status = res.status();
        let body = res.text().await.map_err(|err| WeatherError::Upstream(err.to_string()))?;

        if !status.is_success() {
            return Err(map_status(status.as_u16(), truncate_body(&body)));
        }

        serde_json::from_str(&body).map_err(|err| WeatherError::Malformed(err.to_string()))
    }
}

#[async_trait]
impl WeatherApi for OpenWeatherClient {
    async fn current_conditions(&self, city: &str) -> Result<CurrentConditions, WeatherError> {
        let payload: ApiCurrent = self
            .get_json("weather", city, |status, body| match status {
                404 => WeatherError::NotFound,
                401 => WeatherError::Unauthorized,
                _ => WeatherError::Upstream(format!(
                    "current conditions request failed with status {status}: {body}"
                )),
            })
            .await?;

        payload.try_into()
    }

    async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, WeatherError> {
        let payload: ApiForecast = self
            .get_json("forecast", city, |status, body| {
                WeatherError::Upstream(format!(
                    "forecast request failed with status {status}: {body}"
                ))
            })
            .await?;

        payload
            .list
            .into_iter()
            .map(ForecastEntry::try_from)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct ApiCurrent {
    name: String,
    sys: ApiSys,
    dt: i64,
    main: ApiCurrentMain,
    weather: Vec<ApiWeather>,
    wind: ApiWind,
    visibility: f64,
}

#[derive(Debug, Deserialize)]
struct ApiSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct ApiCurrentMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct ApiWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct ApiWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct ApiForecast {
    list: Vec<ApiForecastSlot>,
}

#[derive(Debug, Deserialize)]
struct ApiForecastSlot {
    dt: i64,
    main: ApiForecastMain,
    weather: Vec<ApiWeather>,
}

#[derive(Debug, Deserialize)]
struct ApiForecastMain {
    temp_min: f64,
    temp_max: f64,
}

impl TryFrom<ApiCurrent> for CurrentConditions {
    type Error = WeatherError;

    fn try_from(payload: ApiCurrent) -> Result<Self, Self::Error> {
        let weather = payload
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Malformed("empty weather array".to_string()))?;

        Ok(CurrentConditions {
            city: payload.name,
            country: payload.sys.country,
            observed_at: epoch_to_utc(payload.dt)?,
            temperature_c: payload.main.temp,
            feels_like_c: payload.main.feels_like,
            humidity_pct: payload.main.humidity,
            description: weather.description,
            icon: weather.icon,
            wind_speed_mps: payload.wind.speed,
            visibility_m: payload.visibility,
        })
    }
}

impl TryFrom<ApiForecastSlot> for ForecastEntry {
    type Error = WeatherError;

    fn try_from(slot: ApiForecastSlot) -> Result<Self, Self::Error> {
        let weather = slot
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Malformed("forecast slot without weather".to_string()))?;

        Ok(ForecastEntry {
            at: epoch_to_utc(slot.dt)?,
            temp_min_c: slot.main.temp_min,
            temp_max_c: slot.main.temp_max,
            description: weather.description,
            icon: weather.icon,
        })
    }
}

fn epoch_to_utc(ts: i64) -> Result<DateTime<Utc>, WeatherError> {
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| WeatherError::Malformed(format!("timestamp {ts} out of range")))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX { format!("{}...", &body[..MAX]) } else { body.to_string() }
}
