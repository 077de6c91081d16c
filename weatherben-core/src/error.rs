//! Error types for weather lookups.

use thiserror::Error;

/// Message shown for every provider failure and every location mismatch.
pub const INVALID_LOCATION_MESSAGE: &str = "Invalid city or country name.";

/// Failure talking to the weather API.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Weather request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Weather API responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode weather response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ProviderError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

/// Why a single lookup failed.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("City name Input is required, Country name cannot be used as sole input")]
    CityRequired,

    #[error("Please enter a city or country.")]
    EmptyInput,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Requested '{requested}' but the API returned {city}, {country}")]
    Mismatch {
        requested: String,
        city: String,
        country: String,
    },
}

impl LookupError {
    /// Text for the UI. Provider failures and mismatches share one message.
    pub fn user_message(&self) -> String {
        match self {
            Self::CityRequired | Self::EmptyInput => self.to_string(),
            Self::Provider(_) | Self::Mismatch { .. } => INVALID_LOCATION_MESSAGE.to_string(),
        }
    }

    /// Whether the lookup was rejected before any request went out.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::CityRequired | Self::EmptyInput)
    }
}
