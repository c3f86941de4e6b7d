// HTTP + WebSocket routes

mod http;
mod ws;

use axum::{Router, routing::get};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};

use crate::models::NodeReport;
use crate::poller::FleetSlots;
use crate::store::SnapshotStore;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) report_tx: broadcast::Sender<NodeReport>,
    pub(crate) store: Arc<SnapshotStore>,
    pub(crate) slots: Arc<FleetSlots>,
    pub(crate) ws_fleet_connections: Arc<AtomicUsize>,
}

pub fn app(
    report_tx: broadcast::Sender<NodeReport>,
    store: Arc<SnapshotStore>,
    slots: Arc<FleetSlots>,
    ws_fleet_connections: Arc<AtomicUsize>,
) -> Router {
    let state = AppState {
        report_tx,
        store,
        slots,
        ws_fleet_connections,
    };
    Router::new()
        .route("/", get(|| async { "fleetpulse: storage fleet vitality service" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/fleet", get(http::fleet_handler)) // GET /api/fleet
        .route("/api/history", get(http::history_handler)) // GET /api/history
        .route("/api/vitality", get(http::vitality_handler)) // GET /api/vitality
        .route("/ws/fleet", get(ws::ws_fleet)) // WS /ws/fleet
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
