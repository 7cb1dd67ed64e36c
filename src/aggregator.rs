use std::{collections::HashSet, future::Future, sync::Arc};

use futures::{stream, Stream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::{
    cache::LastSearchCache,
    clients::{GeoSearchClient, Result},
    config::{SearchConfig, SortMode},
    place_geo::Distance,
    types::{
        place::{Coordinate, Place, SearchPage},
        state::SearchState,
    },
};

/// Follows nearby-search pages for one coordinate and reconciles them into a
/// single sorted list, reusing the last completed search when close enough.
pub struct ResultAggregator<C> {
    client: Arc<C>,
    cache: LastSearchCache,
    config: Arc<SearchConfig>,
}

impl<C> Clone for ResultAggregator<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            cache: self.cache.clone(),
            config: self.config.clone(),
        }
    }
}

enum Step {
    Start,
    Fetch,
    Done,
}

impl<C> ResultAggregator<C>
where
    C: GeoSearchClient + 'static,
{
    pub fn new(client: Arc<C>, cache: LastSearchCache, config: SearchConfig) -> Self {
        Self {
            client,
            cache,
            config: Arc::new(config),
        }
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Yields `Success` straight away on a cache hit, otherwise `Loading`
    /// followed by `Success` or `Error`. Ends early, yielding nothing more,
    /// once `cancel` fires.
    pub fn search(
        &self,
        coordinate: Coordinate,
        cancel: CancellationToken,
    ) -> impl Stream<Item = SearchState> + Send + 'static {
        let this = self.clone();
        stream::unfold(Step::Start, move |step| {
            let this = this.clone();
            let cancel = cancel.clone();
            async move {
                if cancel.is_cancelled() {
                    return None;
                }
                match step {
                    Step::Start => {
                        let cached = this
                            .cache
                            .lookup(coordinate, this.config.proximity_threshold)
                            .await;
                        match cached {
                            Some(places) => {
                                debug!(%coordinate, places = places.len(), "reusing last search");
                                Some((SearchState::Success(places), Step::Done))
                            }
                            None => Some((SearchState::Loading, Step::Fetch)),
                        }
                    }
                    Step::Fetch => {
                        let state = match this.fetch_pages(coordinate, &cancel).await? {
                            Ok(merged) => {
                                let places = reconcile(merged, coordinate, &this.config);
                                if cancel.is_cancelled() {
                                    return None;
                                }
                                this.cache.store(coordinate, places.clone()).await;
                                info!(%coordinate, places = places.len(), "nearby search complete");
                                SearchState::Success(places)
                            }
                            Err(err) => {
                                warn!(%coordinate, error = %err, "nearby search failed");
                                SearchState::Error(err)
                            }
                        };
                        Some((state, Step::Done))
                    }
                    Step::Done => None,
                }
            }
        })
    }

    /// Every page in arrival order, `None` when cancelled part way.
    /// An error on any page discards what came before it.
    #[instrument(skip(self, cancel))]
    async fn fetch_pages(
        &self,
        coordinate: Coordinate,
        cancel: &CancellationToken,
    ) -> Option<Result<Vec<Place>>> {
        let category = self.config.category.as_deref();
        let mut merged = Vec::new();
        let mut page = match until_cancelled(cancel, self.client.nearby_search(coordinate, category))
            .await?
        {
            Ok(page) => page,
            Err(err) => return Some(Err(err)),
        };
        loop {
            let SearchPage {
                places,
                next_page_token,
            } = page;
            merged.extend(places);
            let token = match next_page_token {
                Some(token) if self.config.follow_pages && !merged.is_empty() => token,
                _ => break,
            };
            debug!(so_far = merged.len(), "waiting before the next page");
            until_cancelled(cancel, tokio::time::sleep(self.config.page_delay)).await?;
            page = match until_cancelled(cancel, self.client.nearby_search_continue(&token)).await? {
                Ok(page) => page,
                Err(err) => return Some(Err(err)),
            };
        }
        Some(Ok(merged))
    }
}

async fn until_cancelled<F: Future>(cancel: &CancellationToken, fut: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        out = fut => Some(out),
    }
}

/// De-duplicate, filter and sort a merged result list for `origin`
pub fn reconcile(places: Vec<Place>, origin: Coordinate, config: &SearchConfig) -> Vec<Place> {
    let places = filter_points_of_interest(dedup_by_id(places), config.poi_tag.as_deref());
    sort_places(places, origin, config.sort)
}

/// First occurrence of each place id wins
pub fn dedup_by_id(places: Vec<Place>) -> Vec<Place> {
    let mut seen = HashSet::new();
    places
        .into_iter()
        .filter(|place| seen.insert(place.id.clone()))
        .collect()
}

pub fn filter_points_of_interest(places: Vec<Place>, tag: Option<&str>) -> Vec<Place> {
    match tag {
        None => places,
        Some(tag) => places
            .into_iter()
            .filter(|place| place.has_category(tag))
            .collect(),
    }
}

/// Stable for both modes, equal keys keep their arrival order
pub fn sort_places(mut places: Vec<Place>, origin: Coordinate, mode: SortMode) -> Vec<Place> {
    match mode {
        SortMode::Distance => {
            let mut keyed: Vec<(f64, Place)> = places
                .into_iter()
                .map(|place| (origin.distance_to(&place.coordinate), place))
                .collect();
            keyed.sort_by(|(a, _), (b, _)| a.total_cmp(b));
            keyed.into_iter().map(|(_, place)| place).collect()
        }
        SortMode::Name => {
            places.sort_by_cached_key(|place| {
                (
                    place.name.is_none(),
                    place.name.as_deref().map(str::to_lowercase),
                )
            });
            places
        }
    }
}
