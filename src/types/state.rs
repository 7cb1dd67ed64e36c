use serde::Serialize;

use crate::{
    clients::SearchError,
    types::place::{Coordinate, Place},
};

/// What a UI observes about the current nearby search
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum SearchState {
    #[default]
    Idle,
    Loading,
    Success(Vec<Place>),
    Error(SearchError),
}

impl SearchState {
    /// Success and Error end a search, nothing follows them until a new one starts
    pub fn is_terminal(&self) -> bool {
        matches!(self, SearchState::Success(_) | SearchState::Error(_))
    }

    pub fn places(&self) -> Option<&[Place]> {
        match self {
            SearchState::Success(places) => Some(places),
            _ => None,
        }
    }
}

/// A state tagged with the search that produced it. `search` is 0 before the first one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackedState {
    pub search: u64,
    pub coordinate: Option<Coordinate>,
    pub state: SearchState,
}
