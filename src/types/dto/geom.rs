use serde::Deserialize;

use crate::types::place::Coordinate;

#[derive(Deserialize, Clone, Debug)]
pub struct PartialLatLng {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl From<PartialLatLng> for Option<Coordinate> {
    fn from(value: PartialLatLng) -> Self {
        match (value.lat, value.lon) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
                Some(Coordinate::new(lat, lon))
            }
            _ => None,
        }
    }
}
