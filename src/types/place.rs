use std::{collections::BTreeSet, fmt};

use geo_types::Point;
use serde::{Deserialize, Serialize};

/// A WGS84 position in degrees
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinate> for Point {
    fn from(value: Coordinate) -> Self {
        Point::new(value.lng, value.lat)
    }
}

/// Formats as `lat,lng`, the way the maps web services take a location
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Place {
    pub id: String,
    pub name: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub categories: BTreeSet<String>,
    pub coordinate: Coordinate,
}

impl Place {
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains(category)
    }
}

/// One page of nearby results. `next_page_token` is set when the provider has more.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub places: Vec<Place>,
    pub next_page_token: Option<String>,
}
