//! Search orchestration: form input, displayed weather, errors and history.

use std::sync::Arc;

use crate::{
    error::{LookupError, ProviderError},
    history::{History, HistoryRepository},
    model::{CityQuery, HistoryEntry, WeatherRecord},
    provider::WeatherProvider,
    time,
};

/// Cosmetic light/dark switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Light,
    Dark,
}

impl DisplayMode {
    pub fn toggle(self) -> Self {
        match self {
            DisplayMode::Light => DisplayMode::Dark,
            DisplayMode::Dark => DisplayMode::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == DisplayMode::Dark
    }
}

/// A lookup that passed validation and is waiting for its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLookup {
    pub token: u64,
    pub query: CityQuery,
    /// The `q` value to send.
    pub request: String,
    pub is_history: bool,
}

/// What happened to a completed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    Applied,
    /// Superseded by a newer lookup or a clear; state untouched.
    Stale,
}

#[derive(Debug)]
pub struct WeatherApp {
    provider: Arc<dyn WeatherProvider>,
    repository: Box<dyn HistoryRepository>,

    pub city: String,
    pub country: String,
    weather: Option<WeatherRecord>,
    error: String,
    history: History,
    display_mode: DisplayMode,
    latest_token: u64,
}

impl WeatherApp {
    /// Build the app, rehydrating history from `repository`.
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        repository: Box<dyn HistoryRepository>,
    ) -> anyhow::Result<Self> {
        let history = History::from_entries(repository.load()?);
        tracing::debug!(
            entries = history.len(),
            next_id = ?history.next_id(),
            "history loaded"
        );

        Ok(Self {
            provider,
            repository,
            city: String::new(),
            country: String::new(),
            weather: None,
            error: String::new(),
            history,
            display_mode: DisplayMode::default(),
            latest_token: 0,
        })
    }

    pub fn provider(&self) -> Arc<dyn WeatherProvider> {
        self.provider.clone()
    }

    pub fn weather(&self) -> Option<&WeatherRecord> {
        self.weather.as_ref()
    }

    /// Message for the user; empty when the last action succeeded.
    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.history.entries()
    }

    pub fn history_entry(&self, id: u64) -> Option<&HistoryEntry> {
        self.history.get(id)
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn set_input(&mut self, city: impl Into<String>, country: impl Into<String>) {
        self.city = city.into();
        self.country = country.into();
    }

    /// Search with the current form input.
    pub async fn handle_search(&mut self) -> Result<(), LookupError> {
        let query = CityQuery::trimmed(&self.city, &self.country);
        if query.is_empty() {
            self.weather = None;
            return Err(self.fail(LookupError::EmptyInput));
        }

        self.fetch_weather(&query.city, &query.country, false).await
    }

    pub fn handle_clear(&mut self) {
        self.city.clear();
        self.country.clear();
        self.error.clear();
        self.weather = None;
        // a response still in flight must not repopulate the cleared panel
        self.latest_token += 1;
    }

    pub async fn handle_history_search(
        &mut self,
        entry: &HistoryEntry,
    ) -> Result<(), LookupError> {
        self.fetch_weather(&entry.city, &entry.country, true).await
    }

    /// Returns whether an entry was removed.
    pub fn handle_delete_history(&mut self, id: u64) -> bool {
        let removed = self.history.remove(id);
        if removed {
            self.persist();
        }
        removed
    }

    pub fn toggle_display_mode(&mut self) -> DisplayMode {
        self.display_mode = self.display_mode.toggle();
        self.display_mode
    }

    /// Validate, call the provider, check the answer and update state.
    ///
    /// Replays (`is_history`) never touch the history collection.
    pub async fn fetch_weather(
        &mut self,
        city: &str,
        country: &str,
        is_history: bool,
    ) -> Result<(), LookupError> {
        let pending = self.begin_lookup(city, country, is_history)?;
        let result = self.provider.current_weather(&pending.request).await;
        self.complete_lookup(pending, result).map(|_| ())
    }

    /// First half of a lookup: validate input and issue a sequence token.
    pub fn begin_lookup(
        &mut self,
        city: &str,
        country: &str,
        is_history: bool,
    ) -> Result<PendingLookup, LookupError> {
        let query = CityQuery::new(city, country);
        let request = match query.to_query() {
            Ok(request) => request,
            Err(err) => {
                // a lone country keeps whatever is displayed
                if matches!(err, LookupError::EmptyInput) {
                    self.weather = None;
                }
                return Err(self.fail(err));
            }
        };

        self.latest_token += 1;
        Ok(PendingLookup {
            token: self.latest_token,
            query,
            request,
            is_history,
        })
    }

    /// Second half of a lookup. Responses for superseded tokens are dropped.
    pub fn complete_lookup(
        &mut self,
        pending: PendingLookup,
        result: Result<WeatherRecord, ProviderError>,
    ) -> Result<LookupOutcome, LookupError> {
        if pending.token != self.latest_token {
            tracing::debug!(
                token = pending.token,
                latest = self.latest_token,
                query = %pending.request,
                "discarding stale weather response"
            );
            return Ok(LookupOutcome::Stale);
        }

        let record = match result {
            Ok(record) if pending.query.matches(&record) => record,
            Ok(record) => {
                self.weather = None;
                return Err(self.fail(LookupError::Mismatch {
                    requested: pending.request,
                    city: record.city_name,
                    country: record.country_code,
                }));
            }
            Err(err) => {
                self.weather = None;
                return Err(self.fail(err.into()));
            }
        };

        if !pending.is_history {
            let pushed = self.history.push(
                record.city_name.clone(),
                record.country_code.clone(),
                time::client_timestamp(),
            );
            match pushed {
                Some(id) => {
                    tracing::debug!(id, city = %record.city_name, "added history entry");
                    self.persist();
                }
                None => tracing::error!(city = %record.city_name, "history ids exhausted"),
            }
        }

        self.weather = Some(record);
        self.error.clear();

        Ok(LookupOutcome::Applied)
    }

    fn fail(&mut self, err: LookupError) -> LookupError {
        if err.is_validation() {
            tracing::debug!(error = %err, "lookup rejected");
        } else {
            tracing::warn!(error = %err, "weather lookup failed");
        }
        self.error = err.user_message();
        err
    }

    fn persist(&self) {
        if let Err(err) = self.repository.save(self.history.entries()) {
            tracing::error!(error = ?err, "failed to persist search history");
        }
    }
}
