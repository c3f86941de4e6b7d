// One periodic observation of a storage node, as written by the ingestion process.

use serde::{Deserialize, Serialize};

/// A single node snapshot. Rows are append-only; the engine never mutates them.
///
/// `health == 0` means "no signal", not a literal zero score. `uptime_secs`
/// is monotonically non-decreasing within one run of the node process; a
/// large drop between consecutive snapshots signals a crash/restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    /// Capture instant, epoch milliseconds.
    pub timestamp: u64,
    /// Health score 0-100; 0 = no signal.
    pub health: u8,
    pub uptime_secs: u64,
    pub storage_committed: u64,
    pub storage_used: u64,
    /// Accumulated reward units; absent while the rewards subsystem is
    /// offline or the node has not yet qualified.
    pub credits: Option<u64>,
    pub rank: Option<u32>,
    /// Network tag ("MAINNET", "DEVNET"). Identity-scoping only.
    pub network: String,
}

impl NodeSnapshot {
    pub fn has_signal(&self) -> bool {
        self.health > 0
    }
}
