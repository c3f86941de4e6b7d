// GET handlers: version, history, vitality.
// The fetch-then-derive pipeline lives here: derive identity, fetch rows,
// consolidate, classify - synchronous pure stages after a successful fetch.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use super::AppState;
use crate::analysis::{continuity, forensics, vitality};
use crate::identity;
use crate::models::{NodeReport, TimeRange};
use crate::store::consolidate;
use crate::version::{NAME, VERSION};

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/fleet — latest committed report per watched node.
pub(super) async fn fleet_handler(State(state): State<AppState>) -> impl IntoResponse {
    axum::Json(state.slots.all_latest().await)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct HistoryQuery {
    public_key: String,
    #[serde(default)]
    address: String,
    network: String,
    #[serde(default)]
    committed: Option<u64>,
    #[serde(default)]
    range: Option<String>,
}

/// GET /api/history — consolidated series + per-point forensics for one node.
pub(super) async fn history_handler(
    State(state): State<AppState>,
    Query(q): Query<HistoryQuery>,
) -> Response {
    let range = match &q.range {
        None => TimeRange::H24,
        Some(s) => match TimeRange::parse(s) {
            Some(r) => r,
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    axum::Json(serde_json::json!({
                        "error": format!("unknown range '{}', expected 24H/3D/7D/30D/ALL", s)
                    })),
                )
                    .into_response();
            }
        },
    };
    let identity = derive(&q.public_key, &q.address, &q.network, q.committed);

    let samples = match state
        .store
        .get_history(&identity, range, now_ms() as i64)
        .await
    {
        Ok(samples) => samples,
        Err(e) => return store_error(&identity, "get_history", e),
    };

    let points = consolidate::consolidate(&samples, range);
    let analyses = forensics::analyze_series(&points);

    axum::Json(serde_json::json!({
        "identity": identity,
        "range": range.as_str(),
        "points": points,
        "forensics": analyses,
    }))
    .into_response()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct VitalityQuery {
    public_key: String,
    #[serde(default)]
    address: String,
    network: String,
    #[serde(default)]
    committed: Option<u64>,
}

/// GET /api/vitality — live status + session continuity for one node.
pub(super) async fn vitality_handler(
    State(state): State<AppState>,
    Query(q): Query<VitalityQuery>,
) -> Response {
    let identity = derive(&q.public_key, &q.address, &q.network, q.committed);
    let now = now_ms();

    let history = match state
        .store
        .get_history(&identity, TimeRange::D30, now as i64)
        .await
    {
        Ok(h) => h,
        Err(e) => return store_error(&identity, "get_history", e),
    };
    let Some(live) = history.last().cloned() else {
        return (
            StatusCode::NOT_FOUND,
            axum::Json(serde_json::json!({
                "error": format!("no snapshots for identity '{}'", identity)
            })),
        )
            .into_response();
    };

    let vitality = vitality::classify(&live, &history, now);
    let continuity = continuity::analyze(&history, &live, vitality.status);
    axum::Json(NodeReport {
        identity,
        snapshot: live,
        vitality,
        continuity,
    })
    .into_response()
}

fn derive(public_key: &str, address: &str, network: &str, committed: Option<u64>) -> String {
    match committed {
        Some(bytes) => {
            identity::derive_identity_with_capacity(public_key, address, network, bytes)
        }
        None => identity::derive_identity(public_key, address, network),
    }
}

fn store_error(identity: &str, operation: &str, e: crate::store::FetchError) -> Response {
    tracing::warn!(error = %e, identity = %identity, operation, "snapshot store read failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(serde_json::json!({ "error": "snapshot store unavailable" })),
    )
        .into_response()
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
