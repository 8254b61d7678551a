use thiserror::Error;

/// Everything that can terminate a search.
///
/// `NotFound` and `Unauthorized` only ever come from the current-conditions
/// call; forecast failures collapse into `Upstream`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeatherError {
    #[error("city name is empty")]
    EmptyInput,

    #[error("no API credential configured")]
    MissingCredential,

    #[error("city not found (404)")]
    NotFound,

    #[error("credential rejected (401)")]
    Unauthorized,

    #[error("upstream request failed: {0}")]
    Upstream(String),

    #[error("malformed upstream response: {0}")]
    Malformed(String),
}

impl WeatherError {
    /// User-facing message for the presenter.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyInput => "Please enter a city name.".to_string(),
            Self::MissingCredential => {
                "No API key configured. Run `wxdash configure` and enter your \
                 OpenWeatherMap API key."
                    .to_string()
            }
            Self::NotFound => {
                "City not found. Please check the spelling and try again.".to_string()
            }
            Self::Unauthorized => {
                "Invalid API key. Please check your OpenWeatherMap API key.".to_string()
            }
            Self::Upstream(_) => "Failed to fetch weather data. Please try again later.".to_string(),
            Self::Malformed(_) => {
                "Received an unexpected response from the weather service. Please try again later."
                    .to_string()
            }
        }
    }
}
