use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::{
    clients::{GeoSearchClient, Result, SearchError},
    types::{
        dto::google::{GeocodeResponse, NearbySearchResponse, STATUS_OK, STATUS_ZERO_RESULTS},
        place::{Coordinate, Place, SearchPage},
    },
};

/// Google Places nearby search and Geocoding over the maps web services
#[derive(Clone)]
pub struct GoogleMapsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GoogleMapsClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://maps.googleapis.com/maps/api";

    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<T> {
        Ok(self
            .http
            .get(format!("{}/{}", self.base_url, endpoint))
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await?)
    }
}

fn into_page(response: NearbySearchResponse) -> Result<SearchPage> {
    match response.status.as_str() {
        STATUS_OK | STATUS_ZERO_RESULTS => Ok(SearchPage {
            places: response.results.into_iter().map(Place::from).collect(),
            next_page_token: response.next_page_token,
        }),
        _ => Err(SearchError::Provider {
            status: response.status,
            message: response.error_message,
        }),
    }
}

#[async_trait]
impl GeoSearchClient for GoogleMapsClient {
    #[instrument(skip(self))]
    async fn nearby_search(
        &self,
        coordinate: Coordinate,
        category: Option<&str>,
    ) -> Result<SearchPage> {
        let location = coordinate.to_string();
        let mut query = vec![("rankby", "distance"), ("location", location.as_str())];
        if let Some(category) = category {
            query.push(("type", category));
        }
        let page = into_page(self.get("place/nearbysearch/json", &query).await?)?;
        debug!(
            places = page.places.len(),
            more = page.next_page_token.is_some(),
            "nearby search page"
        );
        Ok(page)
    }

    #[instrument(skip(self))]
    async fn nearby_search_continue(&self, page_token: &str) -> Result<SearchPage> {
        into_page(
            self.get("place/nearbysearch/json", &[("pagetoken", page_token)])
                .await?,
        )
    }

    #[instrument(skip(self))]
    async fn reverse_geocode(
        &self,
        coordinate: Coordinate,
        language: &str,
    ) -> Result<Option<Place>> {
        let latlng = coordinate.to_string();
        let response: GeocodeResponse = self
            .get(
                "geocode/json",
                &[("latlng", latlng.as_str()), ("language", language)],
            )
            .await?;
        if response.status != STATUS_OK {
            if response.status != STATUS_ZERO_RESULTS {
                warn!(status = %response.status, message = ?response.error_message, "reverse geocode gave no place");
            }
            return Ok(None);
        }
        Ok(response.results.into_iter().next().map(Place::from))
    }
}
