//! HTTP route handlers for the ship tracker.

pub mod ships;

use axum::{http::Method, http::StatusCode, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::AppState;

/// Create the main Axum router with all routes.
///
/// Unknown paths answer 404 with an empty body.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .merge(ships::routes())
        .fallback(not_found)
        .layer(cors)
        .with_state(state)
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use aistrack_core::{Coordinate, PositionReport, ReferenceDataStore, ShipTracker};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use chrono::Utc;
    use tokio::sync::RwLock;
    use tower::ServiceExt;

    const OBSERVER: Coordinate = Coordinate::new(54.36441, 9.82202);

    fn state() -> AppState {
        Arc::new(RwLock::new(ShipTracker::new(OBSERVER, ReferenceDataStore::default())))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_empty_table() {
        let (status, body) = get_json(create_router(state()), "/data.json").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({
                "from_kiel": [],
                "to_kiel": [],
                "from_rendsburg": [],
                "to_rendsburg": []
            })
        );
    }

    #[tokio::test]
    async fn test_ship_in_corridor() {
        let state = state();
        state.write().await.update(
            &PositionReport {
                message_type: 1,
                mmsi: 211234560,
                latitude: 54.35,
                longitude: 9.90,
                cog: 270.0,
                sog: 8.0,
            },
            Utc::now(),
        );

        let (status, body) = get_json(create_router(state), "/data.json").await;

        assert_eq!(status, StatusCode::OK);
        let ships = body["to_rendsburg"].as_array().unwrap();
        assert_eq!(ships.len(), 1);
        assert_eq!(ships[0]["mmsi"], 211234560);
        assert_eq!(ships[0]["name"], "211234560");
        assert_eq!(ships[0]["country"], "Unknown");
        assert_eq!(ships[0]["direction"], "east -> west");
        assert_eq!(ships[0]["status"], "leaving");
        assert!(ships[0]["distance"].as_f64().unwrap() > 0.0);
        assert!(ships[0]["seconds_to_arrival"].as_f64().unwrap() > 0.0);
        assert!(ships[0].get("length").is_none());
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let (status, _) = get_json(create_router(state()), "/ships").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get_json(create_router(state()), "/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cross_origin_allowed() {
        let response = create_router(state())
            .oneshot(
                Request::builder()
                    .uri("/data.json")
                    .header(header::ORIGIN, "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }
}
