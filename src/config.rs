use std::{fmt::Display, net::SocketAddr, str::FromStr, time::Duration};

use color_eyre::eyre::{eyre, Result};
use serde::{Deserialize, Serialize};

use crate::geocode::GoogleMapsClient;

/// Continuation tokens are handed out before the provider will accept them
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(1500);
pub const DEFAULT_PROXIMITY_THRESHOLD: f64 = 20.0;
pub const POINT_OF_INTEREST: &str = "point_of_interest";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Nearest to the searched coordinate first
    #[default]
    Distance,
    /// Case-insensitive by name, unnamed places last
    Name,
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "distance" => Ok(SortMode::Distance),
            "name" => Ok(SortMode::Name),
            other => Err(format!("unknown sort mode {other:?}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub follow_pages: bool,
    pub page_delay: Duration,
    /// Metres within which the last search is reused
    pub proximity_threshold: f64,
    pub sort: SortMode,
    /// Sent to the provider as the request type
    pub category: Option<String>,
    /// Places without this tag are dropped. `None` keeps everything.
    pub poi_tag: Option<String>,
    pub language: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            follow_pages: true,
            page_delay: DEFAULT_PAGE_DELAY,
            proximity_threshold: DEFAULT_PROXIMITY_THRESHOLD,
            sort: SortMode::default(),
            category: None,
            poi_tag: Some(POINT_OF_INTEREST.to_string()),
            language: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub maps_url: String,
    pub bind: SocketAddr,
    pub search: SearchConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("PLACE_PICKER_GOOGLE_API_KEY")
            .map_err(|_| eyre!("PLACE_PICKER_GOOGLE_API_KEY is not set"))?;
        let defaults = SearchConfig::default();
        let search = SearchConfig {
            follow_pages: env_or("PLACE_PICKER_FOLLOW_PAGES", defaults.follow_pages)?,
            page_delay: Duration::from_millis(env_or(
                "PLACE_PICKER_PAGE_DELAY_MS",
                defaults.page_delay.as_millis() as u64,
            )?),
            proximity_threshold: env_or("PLACE_PICKER_PROXIMITY_M", defaults.proximity_threshold)?,
            sort: env_or("PLACE_PICKER_SORT", defaults.sort)?,
            category: std::env::var("PLACE_PICKER_TYPE").ok().filter(|t| !t.is_empty()),
            poi_tag: match std::env::var("PLACE_PICKER_POI_TAG") {
                Ok(tag) if tag.is_empty() => None,
                Ok(tag) => Some(tag),
                Err(_) => defaults.poi_tag,
            },
            language: std::env::var("PLACE_PICKER_LANGUAGE").unwrap_or(defaults.language),
        };
        Ok(Self {
            api_key,
            maps_url: std::env::var("PLACE_PICKER_MAPS_URL")
                .unwrap_or_else(|_| GoogleMapsClient::DEFAULT_BASE_URL.to_string()),
            bind: env_or("PLACE_PICKER_BIND", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            search,
        })
    }
}

fn env_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|err| eyre!("{name} has an invalid value {raw:?}: {err}")),
        Err(_) => Ok(default),
    }
}
