// Poller tests: report-slot generation discard, end-to-end poll cycle

mod common;

use common::snapshot;
use fleetpulse::analysis::{continuity, vitality};
use fleetpulse::models::{NodeReport, VitalityStatus};
use fleetpulse::poller::{FleetSlots, PollerConfig, PollerDeps, ReportSlot, spawn};
use fleetpulse::prefs::WatchedNode;
use fleetpulse::store::SnapshotStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize};
use tempfile::TempDir;
use tokio::sync::broadcast;

const MS_PER_HOUR: u64 = 3_600_000;

fn report_for(identity: &str, uptime: u64) -> NodeReport {
    let now = 1_750_000_000_000;
    let live = snapshot(now, 90, uptime);
    let result = vitality::classify(&live, &[], now);
    let cont = continuity::analyze(&[], &live, result.status);
    NodeReport {
        identity: identity.to_string(),
        snapshot: live,
        vitality: result,
        continuity: cont,
    }
}

#[tokio::test]
async fn test_report_slot_discards_superseded_commit() {
    let slot = ReportSlot::new();

    // Two overlapping request scopes: the older one resolves last.
    let stale_token = slot.begin();
    let fresh_token = slot.begin();

    assert!(slot.commit(fresh_token, report_for("A", 50_000)).await);
    assert!(!slot.commit(stale_token, report_for("A", 100)).await);

    let latest = slot.latest().await.expect("latest report");
    assert_eq!(latest.snapshot.uptime_secs, 50_000);
}

#[tokio::test]
async fn test_report_slot_latest_empty_until_commit() {
    let slot = ReportSlot::new();
    assert!(slot.latest().await.is_none());
    let token = slot.begin();
    assert!(slot.commit(token, report_for("A", 50_000)).await);
    assert!(slot.latest().await.is_some());
}

#[tokio::test]
async fn test_fleet_slots_unknown_identity_is_none() {
    let slots = FleetSlots::new();
    assert!(slots.latest("nobody").await.is_none());
}

#[tokio::test]
async fn test_poller_publishes_reports_for_watchlist() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fleet.db");
    let store = Arc::new(
        SnapshotStore::connect(path.to_str().unwrap(), 400)
            .await
            .unwrap(),
    );
    store.init().await.unwrap();

    let watched = WatchedNode {
        public_key: "ABC".into(),
        address: "10.0.0.5:6000".into(),
        network: "MAINNET".into(),
        committed: None,
    };
    let identity = watched.identity();

    // Ten healthy hourly samples ending now.
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64;
    let rows: Vec<_> = (0..10u64)
        .map(|i| snapshot(now - (9 - i) * MS_PER_HOUR, 90, 400_000 + i * 3600))
        .collect();
    store.save_snapshots(&identity, &rows).await.unwrap();

    let slots = Arc::new(FleetSlots::new());
    let (tx, mut rx) = broadcast::channel(8);
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let handle = spawn(
        PollerDeps {
            store,
            slots: slots.clone(),
            tx,
            watchlist: vec![watched],
            ws_fleet_connections: Arc::new(AtomicUsize::new(0)),
            reports_published_total: Arc::new(AtomicU64::new(0)),
            shutdown_rx,
        },
        PollerConfig {
            poll_interval_secs: 1,
            stats_log_interval_secs: 3600,
        },
    );

    // First tick fires immediately; one report should arrive promptly.
    let report = tokio::time::timeout(std::time::Duration::from_secs(3), rx.recv())
        .await
        .expect("report within deadline")
        .expect("broadcast open");
    assert_eq!(report.identity, identity);
    assert_eq!(report.vitality.status, VitalityStatus::Online);

    let cached = slots.latest(&identity).await.expect("slot filled");
    assert_eq!(cached.identity, identity);

    let _ = shutdown_tx.send(());
    handle.await.unwrap();
}
