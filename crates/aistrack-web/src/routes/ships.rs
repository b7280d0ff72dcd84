//! Live ship routes.
//!
//! # Endpoints
//!
//! ### `GET /data.json`
//! Returns the live ship table as four corridor groups (`from_kiel`,
//! `to_kiel`, `from_rendsburg`, `to_rendsburg`), each ordered by distance
//! to the observer.

use axum::{extract::State, response::Json, routing::get, Router};
use tracing::debug;

use aistrack_core::{CorridorView, QueryService};

use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/data.json", get(data_handler))
}

async fn data_handler(State(state): State<AppState>) -> Json<CorridorView> {
    let tracker = state.read().await;
    let view = QueryService::corridors(tracker.table());
    debug!("Serving {} ships", view.len());
    Json(view)
}
