use std::sync::{Arc, Mutex as SyncMutex, PoisonError};

use futures::{stream, Stream, StreamExt};
use tokio::{
    sync::{watch, Mutex},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::{
    aggregator::ResultAggregator,
    clients::{GeoSearchClient, Result},
    types::{
        place::{Coordinate, Place},
        state::{SearchState, TrackedState},
    },
};

pub type ConfirmListener = Arc<dyn Fn(&Place) + Send + Sync>;

struct ActiveSearch {
    coordinate: Coordinate,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl ActiveSearch {
    fn stop(self) {
        self.cancel.cancel();
        self.task.abort();
    }
}

/// One caller's view of a search started or reused through [`SearchSession::search`]
pub struct SearchTicket {
    id: u64,
    coordinate: Coordinate,
    states: watch::Receiver<TrackedState>,
}

impl SearchTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// `None` once a search for another coordinate has replaced this one
    pub fn state(&self) -> Option<SearchState> {
        let tracked = self.states.borrow();
        (tracked.search == self.id).then(|| tracked.state.clone())
    }

    /// Waits for this search to finish. `None` when it was replaced first or the
    /// session went away.
    pub async fn settle(mut self) -> Option<SearchState> {
        let id = self.id;
        let tracked = self
            .states
            .wait_for(|tracked| tracked.search != id || tracked.state.is_terminal())
            .await
            .ok()?
            .clone();
        (tracked.search == id).then_some(tracked.state)
    }
}

/// The state a picker UI watches. Runs at most one search chain at a time.
pub struct SearchSession<C> {
    aggregator: ResultAggregator<C>,
    state: Arc<watch::Sender<TrackedState>>,
    active: Mutex<Option<ActiveSearch>>,
    // Written from inside the state channel's lock, so it has to be a blocking mutex
    last_success: Arc<SyncMutex<Option<Vec<Place>>>>,
    on_confirm: Option<ConfirmListener>,
}

impl<C> SearchSession<C>
where
    C: GeoSearchClient + 'static,
{
    pub fn new(aggregator: ResultAggregator<C>) -> Self {
        let (state, _) = watch::channel(TrackedState::default());
        Self {
            aggregator,
            state: Arc::new(state),
            active: Mutex::new(None),
            last_success: Arc::new(SyncMutex::new(None)),
            on_confirm: None,
        }
    }

    pub fn with_confirm_listener(mut self, listener: impl Fn(&Place) + Send + Sync + 'static) -> Self {
        self.on_confirm = Some(Arc::new(listener));
        self
    }

    /// Starts a search for `coordinate` unless it is the one already loading or
    /// loaded, in which case the ticket refers to that existing search.
    #[instrument(skip(self))]
    pub async fn search(&self, coordinate: Coordinate) -> SearchTicket {
        let mut active = self.active.lock().await;
        if let Some(current) = active.as_ref() {
            let reused = {
                let tracked = self.state.borrow();
                let live = matches!(
                    tracked.state,
                    SearchState::Loading | SearchState::Success(_)
                );
                (current.coordinate == coordinate && live).then_some(tracked.search)
            };
            if let Some(id) = reused {
                debug!(search = id, "coordinate unchanged, keeping current state");
                return self.ticket(id, coordinate);
            }
        }
        if let Some(previous) = active.take() {
            debug!(previous = %previous.coordinate, "abandoning previous search");
            previous.stop();
        }

        let id = self.state.borrow().search + 1;
        let cancel = CancellationToken::new();
        // Published before the task starts so a repeat call sees this search as loading
        self.state.send_replace(TrackedState {
            search: id,
            coordinate: Some(coordinate),
            state: SearchState::Loading,
        });

        let states = self.aggregator.search(coordinate, cancel.clone());
        let sender = self.state.clone();
        let last_success = self.last_success.clone();
        let token = cancel.clone();
        let task = tokio::spawn(async move {
            futures::pin_mut!(states);
            while let Some(next) = states.next().await {
                // Checked under the channel's write lock so a replaced chain can't
                // touch the state or the last success of the search after it
                let mut replaced = false;
                sender.send_if_modified(|current| {
                    if token.is_cancelled() || current.search != id {
                        replaced = true;
                        return false;
                    }
                    if let SearchState::Success(places) = &next {
                        *last_success.lock().unwrap_or_else(PoisonError::into_inner) =
                            Some(places.clone());
                    }
                    if current.state == next {
                        return false;
                    }
                    current.state = next;
                    true
                });
                if replaced {
                    break;
                }
            }
        });

        *active = Some(ActiveSearch {
            coordinate,
            cancel,
            task,
        });
        self.ticket(id, coordinate)
    }

    fn ticket(&self, id: u64, coordinate: Coordinate) -> SearchTicket {
        SearchTicket {
            id,
            coordinate,
            states: self.state.subscribe(),
        }
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().state.clone()
    }

    /// The current state followed by every later change. Ends with the session.
    pub fn states(&self) -> impl Stream<Item = SearchState> + Send + 'static {
        stream::unfold((self.state.subscribe(), true), |(mut rx, first)| async move {
            if !first {
                rx.changed().await.ok()?;
            }
            let state = rx.borrow_and_update().state.clone();
            Some((state, (rx, false)))
        })
    }

    /// Most recent successful list. A failed search does not clear it.
    pub fn last_success(&self) -> Option<Vec<Place>> {
        self.last_success
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The place at an arbitrary map position, for picking a spot that is not a listed venue
    pub async fn place_at(&self, coordinate: Coordinate) -> Result<Option<Place>> {
        self.aggregator
            .client()
            .reverse_geocode(coordinate, &self.aggregator.config().language)
            .await
    }

    pub fn confirm(&self, place: &Place) {
        info!(place_id = %place.id, name = ?place.name, "place confirmed");
        if let Some(listener) = &self.on_confirm {
            listener(place);
        }
    }
}

impl<C> Drop for SearchSession<C> {
    fn drop(&mut self) {
        if let Some(active) = self.active.get_mut().take() {
            active.stop();
        }
    }
}
