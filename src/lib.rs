pub mod aggregator;
pub mod cache;
pub mod clients;
pub mod config;
pub mod geocode;
pub mod place_geo;
pub mod session;
pub mod types;

pub use aggregator::ResultAggregator;
pub use cache::{CachedSearch, LastSearchCache};
pub use clients::{GeoSearchClient, SearchError};
pub use config::{SearchConfig, SortMode};
pub use geocode::GoogleMapsClient;
pub use session::{SearchSession, SearchTicket};
pub use types::{
    place::{Coordinate, Place, SearchPage},
    state::{SearchState, TrackedState},
};
