mod net;

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use net::response::{ResponseError, Result};
use place_picker::{
    config::Config,
    types::dto::geom::PartialLatLng,
    Coordinate, GoogleMapsClient, LastSearchCache, Place, ResultAggregator, SearchSession,
    SearchState,
};
use tower_http::cors::CorsLayer;
use tracing::{info, instrument};

#[derive(Clone)]
struct AppState {
    session: Arc<SearchSession<GoogleMapsClient>>,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    // initialize tracing
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let client = GoogleMapsClient::new(
        reqwest::Client::new(),
        config.maps_url.clone(),
        config.api_key.clone(),
    );
    let aggregator = ResultAggregator::new(
        Arc::new(client),
        LastSearchCache::new(),
        config.search.clone(),
    );
    let session = SearchSession::new(aggregator).with_confirm_listener(|place| {
        info!(place_id = %place.id, coordinate = %place.coordinate, "selection handed to caller");
    });

    let app = Router::new()
        .route("/places/nearby", get(nearby_places))
        .route("/places/state", get(current_state))
        .route("/places/at", get(place_at))
        .route("/places/confirm", post(confirm_place))
        .layer(CorsLayer::permissive())
        .with_state(AppState {
            session: Arc::new(session),
        });

    info!("Running on {}", config.bind);

    axum::Server::bind(&config.bind)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

fn required_coordinate(location: PartialLatLng) -> Result<Coordinate> {
    Option::<Coordinate>::from(location)
        .ok_or_else(|| ResponseError::bad_request("lat and lon are required"))
}

fn status_of(state: &SearchState) -> StatusCode {
    match state {
        SearchState::Idle => StatusCode::OK,
        SearchState::Loading => StatusCode::ACCEPTED,
        SearchState::Success(_) => StatusCode::OK,
        SearchState::Error(_) => StatusCode::BAD_GATEWAY,
    }
}

#[instrument(skip(state))]
async fn nearby_places(
    State(state): State<AppState>,
    Query(location): Query<PartialLatLng>,
) -> Result<(StatusCode, Json<SearchState>)> {
    let coordinate = required_coordinate(location)?;
    let ticket = state.session.search(coordinate).await;
    match ticket.settle().await {
        Some(terminal) => Ok((status_of(&terminal), Json(terminal))),
        None => Err(ResponseError::with_status(
            StatusCode::CONFLICT,
            "search was replaced by one for another location",
        )),
    }
}

async fn current_state(State(state): State<AppState>) -> (StatusCode, Json<SearchState>) {
    let current = state.session.state();
    (status_of(&current), Json(current))
}

#[instrument(skip(state))]
async fn place_at(
    State(state): State<AppState>,
    Query(location): Query<PartialLatLng>,
) -> Result<Json<Option<Place>>> {
    let coordinate = required_coordinate(location)?;
    let place = state
        .session
        .place_at(coordinate)
        .await
        .map_err(ResponseError::bad_gateway)?;
    Ok(Json(place))
}

async fn confirm_place(State(state): State<AppState>, Json(place): Json<Place>) -> StatusCode {
    state.session.confirm(&place);
    StatusCode::NO_CONTENT
}
