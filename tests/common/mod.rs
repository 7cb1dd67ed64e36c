#![allow(dead_code)]

use std::{
    collections::{BTreeSet, HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use place_picker::{
    clients::Result, Coordinate, GeoSearchClient, LastSearchCache, Place, ResultAggregator,
    SearchConfig, SearchError, SearchPage,
};
use tokio::time::Instant;

pub const ORIGIN: Coordinate = Coordinate {
    lat: 51.5007,
    lng: -0.1246,
};

/// `metres` north of ORIGIN, close enough to linear at these scales
pub fn north_of_origin(metres: f64) -> Coordinate {
    Coordinate::new(ORIGIN.lat + metres / 111_257.0, ORIGIN.lng)
}

pub fn poi(id: &str, name: &str, metres: f64) -> Place {
    Place {
        id: id.to_string(),
        name: Some(name.to_string()),
        address: Some(format!("{metres} m up the road")),
        categories: BTreeSet::from(["point_of_interest".to_string(), "establishment".to_string()]),
        coordinate: north_of_origin(metres),
    }
}

pub fn page(places: Vec<Place>, token: Option<&str>) -> SearchPage {
    SearchPage {
        places,
        next_page_token: token.map(str::to_string),
    }
}

pub fn provider_error(status: &str) -> SearchError {
    SearchError::Provider {
        status: status.to_string(),
        message: None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Nearby(Coordinate, Option<String>),
    Continue(String),
    Reverse(Coordinate, String),
}

/// Answers from a script and records every request with the (paused) clock time
#[derive(Default)]
pub struct ScriptedClient {
    first_pages: Mutex<VecDeque<Result<SearchPage>>>,
    next_pages: Mutex<HashMap<String, Result<SearchPage>>>,
    geocoded: Mutex<Option<Place>>,
    calls: Mutex<Vec<(Call, Instant)>>,
}

impl ScriptedClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_first(&self, page: Result<SearchPage>) {
        self.first_pages.lock().unwrap().push_back(page);
    }

    pub fn set_next(&self, token: &str, page: Result<SearchPage>) {
        self.next_pages
            .lock()
            .unwrap()
            .insert(token.to_string(), page);
    }

    pub fn set_geocoded(&self, place: Option<Place>) {
        *self.geocoded.lock().unwrap() = place;
    }

    pub fn calls(&self) -> Vec<(Call, Instant)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn nearby_calls(&self) -> usize {
        self.count(|call| matches!(call, Call::Nearby(..)))
    }

    pub fn continue_calls(&self) -> usize {
        self.count(|call| matches!(call, Call::Continue(..)))
    }

    fn count(&self, f: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|(c, _)| f(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push((call, Instant::now()));
    }
}

#[async_trait]
impl GeoSearchClient for ScriptedClient {
    async fn nearby_search(
        &self,
        coordinate: Coordinate,
        category: Option<&str>,
    ) -> Result<SearchPage> {
        self.record(Call::Nearby(coordinate, category.map(str::to_string)));
        self.first_pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(SearchPage::default()))
    }

    async fn nearby_search_continue(&self, page_token: &str) -> Result<SearchPage> {
        self.record(Call::Continue(page_token.to_string()));
        self.next_pages
            .lock()
            .unwrap()
            .remove(page_token)
            .unwrap_or_else(|| Err(provider_error("INVALID_REQUEST")))
    }

    async fn reverse_geocode(
        &self,
        coordinate: Coordinate,
        language: &str,
    ) -> Result<Option<Place>> {
        self.record(Call::Reverse(coordinate, language.to_string()));
        Ok(self.geocoded.lock().unwrap().clone())
    }
}

pub fn aggregator(
    client: &Arc<ScriptedClient>,
    cache: &LastSearchCache,
    config: SearchConfig,
) -> ResultAggregator<ScriptedClient> {
    ResultAggregator::new(client.clone(), cache.clone(), config)
}
