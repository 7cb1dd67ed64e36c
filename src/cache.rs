use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    place_geo::within,
    types::place::{Coordinate, Place},
};

#[derive(Debug, Clone, PartialEq)]
pub struct CachedSearch {
    pub coordinate: Coordinate,
    pub places: Vec<Place>,
}

/// Single-slot store of the last completed nearby search.
///
/// Clones share the slot, so one handle is created by whoever composes the
/// sessions and passed to each of them. Writers are not coordinated beyond the
/// lock: the last completed search wins.
#[derive(Clone, Default)]
pub struct LastSearchCache {
    slot: Arc<Mutex<Option<CachedSearch>>>,
}

impl LastSearchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached places when `coordinate` is within `threshold` metres of the cached search
    pub async fn lookup(&self, coordinate: Coordinate, threshold: f64) -> Option<Vec<Place>> {
        self.slot
            .lock()
            .await
            .as_ref()
            .filter(|cached| within(&cached.coordinate, &coordinate, threshold))
            .map(|cached| cached.places.clone())
    }

    pub async fn store(&self, coordinate: Coordinate, places: Vec<Place>) {
        *self.slot.lock().await = Some(CachedSearch { coordinate, places });
    }

    pub async fn last(&self) -> Option<CachedSearch> {
        self.slot.lock().await.clone()
    }
}
