//! Human-readable output for lookups and history.

use chrono::{DateTime, Utc};
use inquire::ui::{Color, RenderConfig, Styled};
use weatherben_core::{DisplayMode, HistoryEntry, WeatherApp, WeatherRecord, time};

pub const TITLE: &str = "WeatherBen Weatherman";

pub fn header(mode: DisplayMode) -> String {
    let icon = if mode.is_dark() { "☾" } else { "☀" };
    format!("{icon} {TITLE}")
}

/// Prompt theme for the current display mode.
pub fn theme(mode: DisplayMode) -> RenderConfig<'static> {
    match mode {
        DisplayMode::Light => RenderConfig::default_colored()
            .with_prompt_prefix(Styled::new("☀").with_fg(Color::LightYellow))
            .with_highlighted_option_prefix(Styled::new("›").with_fg(Color::DarkYellow)),
        DisplayMode::Dark => RenderConfig::default_colored()
            .with_prompt_prefix(Styled::new("☾").with_fg(Color::LightBlue))
            .with_highlighted_option_prefix(Styled::new("›").with_fg(Color::DarkGreen)),
    }
}

pub fn weather_panel(record: &WeatherRecord) -> String {
    weather_panel_at(record, Utc::now())
}

/// The current-conditions panel, with the location's time as of `now`.
pub fn weather_panel_at(record: &WeatherRecord, now: DateTime<Utc>) -> String {
    let local_time = time::format_at_offset(now, record.timezone_offset_seconds);

    [
        format!("{}, {}", record.city_name, record.country_code),
        record.condition_main.clone(),
        format!("  {:<15}{}", "Description:", record.condition_description),
        format!("  {:<15}{}°C", "Temperature H:", record.temperature_max),
        format!("  {:<15}{}°C", "Temperature L:", record.temperature_min),
        format!("  {:<15}{}%", "Humidity:", record.humidity_percent),
        format!("  {:<15}{}", "Time:", local_time),
    ]
    .join("\n")
}

/// Error message if the last action failed, otherwise the weather panel.
pub fn lookup_result(app: &WeatherApp) -> String {
    if !app.error().is_empty() {
        return app.error().to_string();
    }

    app.weather().map(weather_panel).unwrap_or_default()
}

pub fn history_label(entry: &HistoryEntry) -> String {
    let place = if entry.country.is_empty() {
        entry.city.clone()
    } else {
        format!("{}, {}", entry.city, entry.country)
    };

    format!("[{}] {:<28} {}", entry.id, place, entry.timestamp)
}

pub fn history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No searches yet.".to_string();
    }

    let mut out = String::from("Search History");
    for entry in entries {
        out.push('\n');
        out.push_str("  ");
        out.push_str(&history_label(entry));
    }
    out
}
