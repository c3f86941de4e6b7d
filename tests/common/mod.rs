// Shared test helpers

use fleetpulse::models::NodeSnapshot;

/// A healthy MAINNET snapshot; tweak fields per test.
pub fn snapshot(timestamp: u64, health: u8, uptime_secs: u64) -> NodeSnapshot {
    NodeSnapshot {
        timestamp,
        health,
        uptime_secs,
        storage_committed: 1_000_000,
        storage_used: 250_000,
        credits: Some(5_000),
        rank: Some(42),
        network: "MAINNET".into(),
    }
}

/// Evenly spaced healthy samples: `count` snapshots every `step_ms`,
/// starting at `start_ms`, uptime advancing with wall time.
pub fn steady_series(start_ms: u64, step_ms: u64, count: usize) -> Vec<NodeSnapshot> {
    (0..count)
        .map(|i| {
            let ts = start_ms + i as u64 * step_ms;
            snapshot(ts, 90, 100_000 + i as u64 * step_ms / 1000)
        })
        .collect()
}
