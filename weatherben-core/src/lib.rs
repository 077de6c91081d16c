//! Core library for the `weatherben` weather lookup app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather provider abstraction and its OpenWeather client
//! - Shared domain models and error types
//! - Search orchestration with persisted history
//! - The Southeast Asia news strip
//!
//! It is used by `weatherben-cli`, but can also be reused by other front-ends.

pub mod app;
pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod provider;
pub mod ticker;
pub mod time;

pub use app::{DisplayMode, LookupOutcome, PendingLookup, WeatherApp};
pub use config::Config;
pub use error::{INVALID_LOCATION_MESSAGE, LookupError, ProviderError};
pub use history::{History, HistoryRepository, JsonFileHistory, MemoryHistory};
pub use model::{CityQuery, HistoryEntry, NewsItem, WeatherRecord};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
