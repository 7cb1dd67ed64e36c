use serde::Deserialize;

use crate::types::place::{Coordinate, Place};

pub const STATUS_OK: &str = "OK";
pub const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

#[derive(Deserialize, Debug)]
pub struct NearbySearchResponse {
    #[serde(default)]
    pub results: Vec<PlaceResult>,
    #[serde(default)]
    pub next_page_token: Option<String>,
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct PlaceResult {
    pub place_id: String,
    // The provider sends null for some results
    #[serde(default)]
    pub types: Option<Vec<String>>,
    pub geometry: Geometry,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub vicinity: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct GeocodeResult {
    pub place_id: String,
    #[serde(default)]
    pub types: Option<Vec<String>>,
    pub geometry: Geometry,
    pub formatted_address: String,
}

#[derive(Deserialize, Debug)]
pub struct Geometry {
    pub location: LatLngLiteral,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct LatLngLiteral {
    pub lat: f64,
    pub lng: f64,
}

impl From<LatLngLiteral> for Coordinate {
    fn from(value: LatLngLiteral) -> Self {
        Coordinate::new(value.lat, value.lng)
    }
}

impl From<PlaceResult> for Place {
    fn from(value: PlaceResult) -> Self {
        Place {
            id: value.place_id,
            name: value.name,
            address: value.vicinity,
            categories: value.types.unwrap_or_default().into_iter().collect(),
            coordinate: value.geometry.location.into(),
        }
    }
}

/// A geocoded address has no venue name, so the formatted address stands in for it
impl From<GeocodeResult> for Place {
    fn from(value: GeocodeResult) -> Self {
        Place {
            id: value.place_id,
            name: Some(value.formatted_address),
            address: None,
            categories: value.types.unwrap_or_default().into_iter().collect(),
            coordinate: value.geometry.location.into(),
        }
    }
}
