//! Southeast Asia news strip: current conditions for a fixed set of cities.

use std::sync::Arc;
use tokio::task::JoinSet;

use crate::{model::NewsItem, provider::WeatherProvider};

/// Cities shown in the strip, as `(name, country code)`.
pub const NEWS_CITIES: [(&str, &str); 6] = [
    ("Singapore", "SG"),
    ("Jakarta", "ID"),
    ("Kuala Lumpur", "MY"),
    ("Bangkok", "TH"),
    ("Manila", "PH"),
    ("Hanoi", "VN"),
];

pub const STRIP_LABEL: &str = "S.E. ASIA";

/// Fetch every city in [`NEWS_CITIES`] concurrently and wait for all of them.
///
/// Failed cities are logged and left out; items arrive in completion order.
pub async fn fetch_news(provider: Arc<dyn WeatherProvider>) -> Vec<NewsItem> {
    fetch_news_for(provider, &NEWS_CITIES).await
}

pub async fn fetch_news_for(
    provider: Arc<dyn WeatherProvider>,
    cities: &[(&str, &str)],
) -> Vec<NewsItem> {
    let mut join_set = JoinSet::new();
    for &(name, country) in cities {
        let provider = provider.clone();
        let name = name.to_string();
        let country = country.to_string();
        join_set.spawn(async move {
            let query = format!("{name},{country}");
            let result = provider.current_weather(&query).await;
            (name, country, result)
        });
    }

    let mut items = Vec::with_capacity(cities.len());
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((name, country, Ok(record))) => items.push(NewsItem {
                city_name: name,
                country_code: country,
                condition_description: record.condition_description,
            }),
            Ok((name, _, Err(err))) => {
                tracing::warn!(
                    city = %name,
                    error = %err,
                    "Error fetching weather for news strip"
                );
            }
            Err(err) => {
                tracing::warn!(error = %err, "news strip task failed");
            }
        }
    }

    items
}

/// One-line rendering of the strip.
pub fn format_strip(items: &[NewsItem]) -> String {
    let body = items
        .iter()
        .map(|item| {
            format!(
                "{}, {}: {}",
                item.city_name, item.country_code, item.condition_description
            )
        })
        .collect::<Vec<_>>()
        .join("    ");

    if body.is_empty() {
        STRIP_LABEL.to_string()
    } else {
        format!("{STRIP_LABEL} | {body}")
    }
}
