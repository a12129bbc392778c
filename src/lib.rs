pub mod config;
pub mod engine;
pub mod logging;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod workers;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::state::AppState;
use crate::store::{DeckStore, StoreError};

/// Prepares deck storage and builds the shared state.
pub async fn create_state(config: &Config) -> Result<AppState, StoreError> {
    let store = DeckStore::new(config.data_dir.clone(), config.decks.clone());
    store.init().await?;
    Ok(AppState::new(store))
}

pub fn create_app(state: AppState) -> axum::Router {
    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
