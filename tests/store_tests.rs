// SnapshotStore tests: connect, init, save, identity-scoped reads, range
// windows, prune. The fetch + consolidate pipeline scenario lives here too.

mod common;

use common::snapshot;
use fleetpulse::models::{MS_PER_DAY, NodeSnapshot, TimeRange};
use fleetpulse::store::SnapshotStore;
use fleetpulse::store::consolidate::consolidate;
use tempfile::TempDir;

async fn open_store(dir: &TempDir, retention_days: u32) -> SnapshotStore {
    let path = dir.path().join("fleet.db");
    let store = SnapshotStore::connect(path.to_str().unwrap(), retention_days)
        .await
        .unwrap();
    store.init().await.unwrap();
    store
}

#[tokio::test]
async fn test_store_connect_and_init_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir, 30).await;
    // Second init is a no-op (IF NOT EXISTS)
    store.init().await.unwrap();
}

#[tokio::test]
async fn test_store_save_and_read_ascending() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir, 30).await;

    let rows = vec![
        snapshot(3_000, 90, 300),
        snapshot(1_000, 80, 100),
        snapshot(2_000, 85, 200),
    ];
    store.save_snapshots("ABC-10.0.0.5-MAINNET", &rows).await.unwrap();

    let read = store
        .get_snapshots_since("ABC-10.0.0.5-MAINNET", 0)
        .await
        .unwrap();
    assert_eq!(read.len(), 3);
    assert_eq!(read[0].timestamp, 1_000);
    assert_eq!(read[1].timestamp, 2_000);
    assert_eq!(read[2].timestamp, 3_000);
    assert_eq!(read[0].health, 80);
    assert_eq!(read[0].credits, Some(5_000));
    assert_eq!(read[0].network, "MAINNET");
}

#[tokio::test]
async fn test_store_save_empty_is_no_op() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir, 30).await;
    store.save_snapshots("ABC-private-MAINNET", &[]).await.unwrap();
    let read = store
        .get_snapshots_since("ABC-private-MAINNET", 0)
        .await
        .unwrap();
    assert!(read.is_empty());
}

#[tokio::test]
async fn test_store_scopes_reads_by_identity() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir, 30).await;

    store
        .save_snapshots("ABC-10.0.0.5-MAINNET", &[snapshot(1_000, 80, 100)])
        .await
        .unwrap();
    store
        .save_snapshots("XYZ-10.0.0.6-MAINNET", &[snapshot(1_500, 70, 200)])
        .await
        .unwrap();

    let abc = store
        .get_snapshots_since("ABC-10.0.0.5-MAINNET", 0)
        .await
        .unwrap();
    assert_eq!(abc.len(), 1);
    assert_eq!(abc[0].health, 80);

    let none = store
        .get_snapshots_since("ABC-10.0.0.5-DEVNET", 0)
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_store_get_latest() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir, 30).await;

    assert!(store.get_latest("ABC-private-MAINNET").await.unwrap().is_none());

    let mut newest = snapshot(5_000, 95, 500);
    newest.rank = None;
    store
        .save_snapshots(
            "ABC-private-MAINNET",
            &[snapshot(1_000, 80, 100), newest.clone()],
        )
        .await
        .unwrap();
    let latest = store.get_latest("ABC-private-MAINNET").await.unwrap();
    assert_eq!(latest, Some(newest));
}

// 40 days of data, two samples per day (midnight + noon). ALL consolidates
// to one averaged point per day; 24H returns the last day's raw samples.
#[tokio::test]
async fn test_store_history_pipeline_windows_and_consolidates() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir, 400).await;

    let now = 1_750_000_000_000u64 / MS_PER_DAY as u64 * MS_PER_DAY as u64
        + MS_PER_DAY as u64 / 2; // noon
    let mut rows: Vec<NodeSnapshot> = Vec::new();
    for k in 0..80u64 {
        let ts = now - k * (MS_PER_DAY as u64 / 2);
        let health = if k % 2 == 0 { 90 } else { 80 };
        rows.push(snapshot(ts, health, 500_000 - k * 1000));
    }
    store.save_snapshots("ABC-10.0.0.5-MAINNET", &rows).await.unwrap();

    let all = store
        .get_history("ABC-10.0.0.5-MAINNET", TimeRange::All, now as i64)
        .await
        .unwrap();
    assert_eq!(all.len(), 80);
    let daily = consolidate(&all, TimeRange::All);
    assert_eq!(daily.len(), 40);
    for p in &daily {
        assert_eq!(p.samples, 2);
        assert_eq!(p.health, 85.0);
    }

    let day = store
        .get_history("ABC-10.0.0.5-MAINNET", TimeRange::H24, now as i64)
        .await
        .unwrap();
    assert_eq!(day.len(), 3); // noon, midnight, previous noon (inclusive window)
    let raw = consolidate(&day, TimeRange::H24);
    assert_eq!(raw.len(), 3);
    assert!(raw.iter().all(|p| p.samples == 1));
}

#[tokio::test]
async fn test_store_prune_respects_retention() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir, 30).await;

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64;
    let old = now - 40 * MS_PER_DAY as u64;
    store
        .save_snapshots(
            "ABC-10.0.0.5-MAINNET",
            &[snapshot(old, 80, 100), snapshot(now, 90, 200)],
        )
        .await
        .unwrap();

    let pruned = store.prune_old_data().await.unwrap();
    assert_eq!(pruned, 1);

    let left = store
        .get_snapshots_since("ABC-10.0.0.5-MAINNET", 0)
        .await
        .unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].timestamp, now);

    store.vacuum().await.unwrap();
}
