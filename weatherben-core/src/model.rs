use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// Current conditions for one location, as returned by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city_name: String,
    pub country_code: String,
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub humidity_percent: u8,
    pub condition_main: String,
    pub condition_description: String,
    /// Shift from UTC in seconds, may be negative.
    pub timezone_offset_seconds: i32,
}

/// A past successful search.
///
/// Field names match the stored JSON layout (`storedHistory`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: u64,
    pub city: String,
    pub country: String,
    /// Client-local time of the search, not the searched city's time.
    pub timestamp: String,
}

/// One city in the news strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsItem {
    pub city_name: String,
    pub country_code: String,
    pub condition_description: String,
}

/// City/country input for a lookup, already trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityQuery {
    pub city: String,
    pub country: String,
}

impl CityQuery {
    pub fn new(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
        }
    }

    /// Trims surrounding whitespace from both fields.
    pub fn trimmed(city: &str, country: &str) -> Self {
        Self::new(city.trim(), country.trim())
    }

    pub fn is_empty(&self) -> bool {
        self.city.is_empty() && self.country.is_empty()
    }

    /// Build the `q` parameter for the weather API.
    ///
    /// A country on its own is rejected: the API resolves `q` by city name.
    pub fn to_query(&self) -> Result<String, LookupError> {
        match (self.city.is_empty(), self.country.is_empty()) {
            (false, false) => Ok(format!("{},{}", self.city, self.country)),
            (false, true) => Ok(self.city.clone()),
            (true, false) => Err(LookupError::CityRequired),
            (true, true) => Err(LookupError::EmptyInput),
        }
    }

    /// Checks a response against the fields that were actually supplied.
    pub fn matches(&self, record: &WeatherRecord) -> bool {
        let city_ok =
            self.city.is_empty() || record.city_name.to_lowercase() == self.city.to_lowercase();
        let country_ok = self.country.is_empty()
            || record.country_code.to_lowercase() == self.country.to_lowercase();

        city_ok && country_ok
    }
}

#[cfg(test)]
pub(crate) fn sample_record(city: &str, country: &str) -> WeatherRecord {
    WeatherRecord {
        city_name: city.to_string(),
        country_code: country.to_string(),
        temperature_min: 26.4,
        temperature_max: 31.9,
        humidity_percent: 74,
        condition_main: "Clouds".to_string(),
        condition_description: "broken clouds".to_string(),
        timezone_offset_seconds: 25200,
    }
}
