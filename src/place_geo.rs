use geo::{HaversineDistance, VincentyDistance};
use geo_types::Point;

use crate::types::place::Coordinate;

/// Geodesic distance in metres. Vincenty on the ellipsoid, falling back to
/// haversine for the near-antipodal pairs where Vincenty fails to converge.
pub trait Distance<Rhs = Self> {
    fn distance_to(&self, other: &Rhs) -> f64;
}

impl Distance for Point<f64> {
    fn distance_to(&self, other: &Point<f64>) -> f64 {
        self.vincenty_distance(other)
            .unwrap_or_else(|_| self.haversine_distance(other))
    }
}

impl Distance for Coordinate {
    fn distance_to(&self, other: &Coordinate) -> f64 {
        Point::from(*self).distance_to(&Point::from(*other))
    }
}

/// Inclusive: a point exactly `threshold` metres away is within it
pub fn within(origin: &Coordinate, other: &Coordinate, threshold: f64) -> bool {
    origin.distance_to(other) <= threshold
}
