use crate::{
    Config, WeatherRecord, error::ProviderError, provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current conditions.
///
/// `query` is the OpenWeather-style `q` value: `"city"` or `"city,country"`.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, query: &str) -> Result<WeatherRecord, ProviderError>;
}

/// Construct the OpenWeather provider from config, taking the API key from
/// `env_api_key` when set.
pub fn provider_from_config(
    config: &Config,
    env_api_key: Option<String>,
) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.resolve_api_key(env_api_key)?;

    Ok(OpenWeatherProvider::with_base_url(api_key, config.api_base_url()))
}
