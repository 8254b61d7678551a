//! Orchestrates a search: validation, the two concurrent fetches, forecast
//! reduction, persistence of the last city, and presenter updates.

use chrono::Local;

use crate::client::WeatherApi;
use crate::config::DEFAULT_CITY;
use crate::error::WeatherError;
use crate::model::{CurrentConditions, DailyForecast};
use crate::{demo, forecast};

/// Rendering surface. The orchestrator never touches the terminal (or any
/// other UI) directly; it calls exactly one of `show_error`/`show_result`
/// per completed search.
pub trait Presenter {
    fn show_loading(&mut self);

    fn show_error(&mut self, message: &str);

    fn show_result(&mut self, current: &CurrentConditions, daily: &[DailyForecast]);

    /// Annotation shown before demo-mode results at startup.
    fn show_demo_notice(&mut self);
}

/// Persistence seam for the last searched city.
pub trait CityStore: Send + Sync {
    fn last_city(&self) -> Option<String>;

    fn remember(&self, city: &str) -> anyhow::Result<()>;
}

/// Terminal state of one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Success,
    Failed,
}

pub struct Dashboard {
    /// `None` when no credential is configured; every search then fails
    /// before any request goes out.
    client: Option<Box<dyn WeatherApi>>,
    store: Box<dyn CityStore>,
}

impl Dashboard {
    pub fn new(client: Option<Box<dyn WeatherApi>>, store: Box<dyn CityStore>) -> Self {
        Self { client, store }
    }

    /// One user-initiated search. Validates, fetches, renders.
    pub async fn search(&self, city: &str, presenter: &mut dyn Presenter) -> SearchOutcome {
        let city = city.trim();
        if city.is_empty() {
            presenter.show_error(&WeatherError::EmptyInput.user_message());
            return SearchOutcome::Failed;
        }

        let Some(client) = self.client.as_deref() else {
            presenter.show_error(&WeatherError::MissingCredential.user_message());
            return SearchOutcome::Failed;
        };

        match self.run_search(client, city, presenter).await {
            Ok(()) => SearchOutcome::Success,
            Err(err) => {
                tracing::debug!(%err, city, "search failed");
                presenter.show_error(&err.user_message());
                SearchOutcome::Failed
            }
        }
    }

    /// Startup flow: restore the last city and try a live fetch, falling
    /// back to the bundled demo data instead of surfacing transient errors.
    pub async fn initialize(&self, presenter: &mut dyn Presenter) -> SearchOutcome {
        let city = self.store.last_city().unwrap_or_else(|| DEFAULT_CITY.to_string());

        let Some(client) = self.client.as_deref() else {
            presenter.show_error(&WeatherError::MissingCredential.user_message());
            return SearchOutcome::Failed;
        };

        match self.run_search(client, &city, presenter).await {
            Ok(()) => SearchOutcome::Success,
            Err(err) => {
                tracing::warn!(%err, city, "live fetch failed at startup, showing demo data");
                presenter.show_demo_notice();
                presenter.show_result(&demo::current_conditions(), &demo::daily_forecasts());
                SearchOutcome::Success
            }
        }
    }

    /// Both requests in flight together; both are awaited, and a
    /// current-conditions error takes precedence over a forecast error.
    async fn run_search(
        &self,
        client: &dyn WeatherApi,
        city: &str,
        presenter: &mut dyn Presenter,
    ) -> Result<(), WeatherError> {
        presenter.show_loading();

        let (current, entries) =
            tokio::join!(client.current_conditions(city), client.forecast(city));

        let current = current?;
        let entries = entries?;

        let daily = forecast::reduce_daily(&entries, &Local);

        if let Err(err) = self.store.remember(city) {
            tracing::warn!("failed to persist last city: {err:#}");
        }

        presenter.show_result(&current, &daily);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ForecastEntry;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Cloneable handle; clones share the call counters, so the test keeps
    /// one handle and hands the other to the dashboard.
    #[derive(Debug, Clone, Default)]
    struct FakeApi {
        current_calls: Arc<AtomicUsize>,
        forecast_calls: Arc<AtomicUsize>,
        current_error: Option<WeatherError>,
        forecast_error: Option<WeatherError>,
    }

    impl FakeApi {
        fn failing_current(err: WeatherError) -> Self {
            Self { current_error: Some(err), ..Self::default() }
        }

        fn failing_forecast(err: WeatherError) -> Self {
            Self { forecast_error: Some(err), ..Self::default() }
        }
    }

    fn sample_current(city: &str) -> CurrentConditions {
        CurrentConditions {
            city: city.to_string(),
            country: "LK".to_string(),
            observed_at: Utc::now(),
            temperature_c: 28.4,
            feels_like_c: 32.1,
            humidity_pct: 78,
            description: "scattered clouds".to_string(),
            icon: "03d".to_string(),
            wind_speed_mps: 3.5,
            visibility_m: 10_000.0,
        }
    }

    fn sample_entries() -> Vec<ForecastEntry> {
        // Six distinct days at 12:00 UTC, a day apart, so the reducer always
        // sees six dates regardless of the host time zone.
        let start = Utc::now().date_naive().and_hms_opt(12, 0, 0).expect("valid time").and_utc();
        (0..6)
            .map(|i| ForecastEntry {
                at: start + Duration::days(i),
                temp_min_c: 24.0,
                temp_max_c: 30.0,
                description: "clouds".to_string(),
                icon: "03d".to_string(),
            })
            .collect()
    }

    #[async_trait]
    impl WeatherApi for FakeApi {
        async fn current_conditions(&self, city: &str) -> Result<CurrentConditions, WeatherError> {
            self.current_calls.fetch_add(1, Ordering::SeqCst);
            match &self.current_error {
                Some(err) => Err(err.clone()),
                None => Ok(sample_current(city)),
            }
        }

        async fn forecast(&self, _city: &str) -> Result<Vec<ForecastEntry>, WeatherError> {
            self.forecast_calls.fetch_add(1, Ordering::SeqCst);
            match &self.forecast_error {
                Some(err) => Err(err.clone()),
                None => Ok(sample_entries()),
            }
        }
    }

    #[derive(Default)]
    struct RecordingPresenter {
        loading_count: usize,
        error: Option<String>,
        result: Option<(CurrentConditions, Vec<DailyForecast>)>,
        demo_notice: bool,
    }

    impl Presenter for RecordingPresenter {
        fn show_loading(&mut self) {
            self.loading_count += 1;
        }

        fn show_error(&mut self, message: &str) {
            self.error = Some(message.to_string());
        }

        fn show_result(&mut self, current: &CurrentConditions, daily: &[DailyForecast]) {
            self.result = Some((current.clone(), daily.to_vec()));
        }

        fn show_demo_notice(&mut self) {
            self.demo_notice = true;
        }
    }

    /// Cloneable handle over shared state, mirroring [`FakeApi`].
    #[derive(Debug, Clone, Default)]
    struct MemoryStore {
        city: Arc<Mutex<Option<String>>>,
    }

    impl MemoryStore {
        fn with_city(city: &str) -> Self {
            Self { city: Arc::new(Mutex::new(Some(city.to_string()))) }
        }

        fn saved(&self) -> Option<String> {
            self.city.lock().expect("lock").clone()
        }
    }

    impl CityStore for MemoryStore {
        fn last_city(&self) -> Option<String> {
            self.city.lock().expect("lock").clone()
        }

        fn remember(&self, city: &str) -> anyhow::Result<()> {
            *self.city.lock().expect("lock") = Some(city.to_string());
            Ok(())
        }
    }

    fn dashboard(api: FakeApi) -> (Dashboard, FakeApi, MemoryStore) {
        let store = MemoryStore::default();
        let dashboard = Dashboard::new(Some(Box::new(api.clone())), Box::new(store.clone()));
        (dashboard, api, store)
    }

    #[tokio::test]
    async fn successful_search_renders_and_persists() {
        let (dashboard, api, store) = dashboard(FakeApi::default());
        let mut presenter = RecordingPresenter::default();

        let outcome = dashboard.search("Colombo", &mut presenter).await;

        assert_eq!(outcome, SearchOutcome::Success);
        assert_eq!(api.current_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.forecast_calls.load(Ordering::SeqCst), 1);
        assert_eq!(presenter.loading_count, 1);
        assert!(presenter.error.is_none());
        assert_eq!(store.saved().as_deref(), Some("Colombo"));

        let (current, daily) = presenter.result.expect("result rendered");
        assert_eq!(current.city, "Colombo");
        assert_eq!(daily.len(), 5);
    }

    #[tokio::test]
    async fn search_trims_city_before_use() {
        let (dashboard, _, store) = dashboard(FakeApi::default());
        let mut presenter = RecordingPresenter::default();

        let outcome = dashboard.search("  Colombo  ", &mut presenter).await;

        assert_eq!(outcome, SearchOutcome::Success);
        assert_eq!(store.saved().as_deref(), Some("Colombo"));
    }

    #[tokio::test]
    async fn empty_input_fails_without_any_request() {
        let (dashboard, api, store) = dashboard(FakeApi::default());
        let mut presenter = RecordingPresenter::default();

        let outcome = dashboard.search("   ", &mut presenter).await;

        assert_eq!(outcome, SearchOutcome::Failed);
        assert_eq!(api.current_calls.load(Ordering::SeqCst), 0);
        assert_eq!(api.forecast_calls.load(Ordering::SeqCst), 0);
        assert_eq!(presenter.loading_count, 0);
        assert_eq!(presenter.error.as_deref(), Some("Please enter a city name."));
        assert_eq!(store.saved(), None);
    }

    #[tokio::test]
    async fn missing_credential_fails_without_any_request() {
        let dashboard = Dashboard::new(None, Box::new(MemoryStore::default()));
        let mut presenter = RecordingPresenter::default();

        let outcome = dashboard.search("Colombo", &mut presenter).await;

        assert_eq!(outcome, SearchOutcome::Failed);
        assert!(presenter.error.expect("error shown").contains("API key"));
    }

    #[tokio::test]
    async fn not_found_fails_without_persisting() {
        let (dashboard, _, store) = dashboard(FakeApi::failing_current(WeatherError::NotFound));
        let mut presenter = RecordingPresenter::default();

        let outcome = dashboard.search("Xyzzyxx", &mut presenter).await;

        assert_eq!(outcome, SearchOutcome::Failed);
        assert!(presenter.error.expect("error shown").contains("not found"));
        assert!(presenter.result.is_none());
        assert_eq!(store.saved(), None);
    }

    #[tokio::test]
    async fn current_conditions_error_takes_precedence() {
        let api = FakeApi {
            current_error: Some(WeatherError::Unauthorized),
            forecast_error: Some(WeatherError::Upstream("status 500".into())),
            ..FakeApi::default()
        };
        let (dashboard, _, _) = dashboard(api);
        let mut presenter = RecordingPresenter::default();

        dashboard.search("Colombo", &mut presenter).await;

        assert!(presenter.error.expect("error shown").contains("Invalid API key"));
    }

    #[tokio::test]
    async fn forecast_only_failure_surfaces_generic_message() {
        let (dashboard, _, _) =
            dashboard(FakeApi::failing_forecast(WeatherError::Upstream("status 502".into())));
        let mut presenter = RecordingPresenter::default();

        let outcome = dashboard.search("Colombo", &mut presenter).await;

        assert_eq!(outcome, SearchOutcome::Failed);
        assert_eq!(
            presenter.error.as_deref(),
            Some("Failed to fetch weather data. Please try again later.")
        );
    }

    #[tokio::test]
    async fn initialize_uses_stored_city() {
        let store = MemoryStore::with_city("Oslo");
        let dashboard =
            Dashboard::new(Some(Box::new(FakeApi::default())), Box::new(store.clone()));
        let mut presenter = RecordingPresenter::default();

        let outcome = dashboard.initialize(&mut presenter).await;

        assert_eq!(outcome, SearchOutcome::Success);
        let (current, _) = presenter.result.expect("result rendered");
        assert_eq!(current.city, "Oslo");
    }

    #[tokio::test]
    async fn initialize_defaults_to_colombo() {
        let (dashboard, _, _) = dashboard(FakeApi::default());
        let mut presenter = RecordingPresenter::default();

        dashboard.initialize(&mut presenter).await;

        let (current, _) = presenter.result.expect("result rendered");
        assert_eq!(current.city, "Colombo");
    }

    #[tokio::test]
    async fn initialize_falls_back_to_demo_data_on_fetch_failure() {
        let (dashboard, _, store) =
            dashboard(FakeApi::failing_current(WeatherError::Upstream("connect error".into())));
        let mut presenter = RecordingPresenter::default();

        let outcome = dashboard.initialize(&mut presenter).await;

        assert_eq!(outcome, SearchOutcome::Success);
        assert!(presenter.demo_notice);
        assert!(presenter.error.is_none());
        assert_eq!(store.saved(), None);

        let (current, daily) = presenter.result.expect("demo data rendered");
        assert_eq!(current.city, "Colombo");
        assert_eq!(daily.len(), 5);
    }

    #[tokio::test]
    async fn initialize_without_credential_is_a_real_error() {
        let dashboard = Dashboard::new(None, Box::new(MemoryStore::default()));
        let mut presenter = RecordingPresenter::default();

        let outcome = dashboard.initialize(&mut presenter).await;

        assert_eq!(outcome, SearchOutcome::Failed);
        assert!(!presenter.demo_notice);
        assert!(presenter.error.expect("error shown").contains("API key"));
    }
}
