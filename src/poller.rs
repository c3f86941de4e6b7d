// Watchlist poller: fetch -> classify -> publish on a fixed interval.
// Each node's derived state lives in a ReportSlot guarded by a request
// generation; a superseded fetch's result is dropped, never committed.
// Last-writer-wins by generation, not by completion order.

use crate::analysis::{continuity, vitality};
use crate::models::{NodeReport, TimeRange};
use crate::prefs::WatchedNode;
use crate::store::SnapshotStore;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::{RwLock, broadcast};
use tokio::time::{Duration, Instant, interval};

/// Rate limit for "no receivers" logging (avoid a line per poll when no one
/// is on /ws/fleet).
const NO_RECEIVERS_WARN_INTERVAL: Duration = Duration::from_secs(60);

/// Latest derived state for one node, with stale-commit protection.
pub struct ReportSlot {
    generation: AtomicU64,
    latest: RwLock<Option<NodeReport>>,
}

impl ReportSlot {
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            latest: RwLock::new(None),
        }
    }

    /// Opens a new request scope and returns its token. Tokens from earlier
    /// calls become stale immediately.
    pub fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Commits a report for `token`. Returns false and drops the report
    /// when a newer scope has been opened since.
    pub async fn commit(&self, token: u64, report: NodeReport) -> bool {
        if self.generation.load(Ordering::SeqCst) != token {
            return false;
        }
        *self.latest.write().await = Some(report);
        true
    }

    pub async fn latest(&self) -> Option<NodeReport> {
        self.latest.read().await.clone()
    }
}

impl Default for ReportSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Slot registry keyed by stable identity.
pub struct FleetSlots {
    slots: RwLock<HashMap<String, Arc<ReportSlot>>>,
}

impl FleetSlots {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }

    pub async fn slot(&self, identity: &str) -> Arc<ReportSlot> {
        if let Some(slot) = self.slots.read().await.get(identity) {
            return slot.clone();
        }
        let mut slots = self.slots.write().await;
        slots
            .entry(identity.to_string())
            .or_insert_with(|| Arc::new(ReportSlot::new()))
            .clone()
    }

    pub async fn latest(&self, identity: &str) -> Option<NodeReport> {
        let slot = {
            let slots = self.slots.read().await;
            slots.get(identity).cloned()
        };
        match slot {
            Some(slot) => slot.latest().await,
            None => None,
        }
    }

    /// Latest committed report per watched node, sorted by identity.
    pub async fn all_latest(&self) -> Vec<NodeReport> {
        let slots: Vec<Arc<ReportSlot>> = self.slots.read().await.values().cloned().collect();
        let mut out = Vec::with_capacity(slots.len());
        for slot in slots {
            if let Some(report) = slot.latest().await {
                out.push(report);
            }
        }
        out.sort_by(|a, b| a.identity.cmp(&b.identity));
        out
    }
}

impl Default for FleetSlots {
    fn default() -> Self {
        Self::new()
    }
}

/// Store, channels, and shutdown for the poller.
pub struct PollerDeps {
    pub store: Arc<SnapshotStore>,
    pub slots: Arc<FleetSlots>,
    pub tx: broadcast::Sender<NodeReport>,
    pub watchlist: Vec<WatchedNode>,
    pub ws_fleet_connections: Arc<AtomicUsize>,
    pub reports_published_total: Arc<AtomicU64>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Poller timing and logging config. Stats logging uses real-time
/// intervals, independent of poll_interval_secs.
pub struct PollerConfig {
    pub poll_interval_secs: u64,
    pub stats_log_interval_secs: u64,
}

pub fn spawn(deps: PollerDeps, config: PollerConfig) -> tokio::task::JoinHandle<()> {
    let PollerDeps {
        store,
        slots,
        tx,
        watchlist,
        ws_fleet_connections,
        reports_published_total,
        mut shutdown_rx,
    } = deps;
    let PollerConfig {
        poll_interval_secs,
        stats_log_interval_secs,
    } = config;

    tokio::spawn(async move {
        let mut tick = interval(Duration::from_secs(poll_interval_secs));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut last_no_receivers_warn: Option<Instant> = None;

        let poller_span = tracing::span!(tracing::Level::DEBUG, "poller", poll_interval_secs);
        let _guard = poller_span.enter();

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    poll_watchlist(
                        &store,
                        &slots,
                        &tx,
                        &watchlist,
                        &reports_published_total,
                        &mut last_no_receivers_warn,
                    )
                    .await;
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Poller shutting down");
                    break;
                }
                _ = stats_log_tick.tick() => {
                    tracing::info!(
                        ws_fleet_clients =
                            ws_fleet_connections.load(Ordering::Relaxed),
                        reports_published_total = reports_published_total.load(Ordering::Relaxed),
                        watched_nodes = watchlist.len(),
                        "app stats"
                    );
                }
            }
        }
    })
}

async fn poll_watchlist(
    store: &SnapshotStore,
    slots: &FleetSlots,
    tx: &broadcast::Sender<NodeReport>,
    watchlist: &[WatchedNode],
    reports_published_total: &AtomicU64,
    last_no_receivers_warn: &mut Option<Instant>,
) {
    let now_ms = now_ms();

    for node in watchlist {
        let identity = node.identity();
        let slot = slots.slot(&identity).await;
        let token = slot.begin();

        // The classifier is never invoked on a failed fetch; the node's
        // tick is skipped and the failure surfaced in the log.
        let history = match store.get_history(&identity, TimeRange::D30, now_ms as i64).await {
            Ok(h) => h,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    identity = %identity,
                    operation = "get_history",
                    "history fetch failed"
                );
                continue;
            }
        };
        let Some(live) = history.last().cloned() else {
            tracing::debug!(identity = %identity, "no snapshots yet");
            continue;
        };

        let vitality = vitality::classify(&live, &history, now_ms);
        let continuity = continuity::analyze(&history, &live, vitality.status);
        let report = NodeReport {
            identity: identity.clone(),
            snapshot: live,
            vitality,
            continuity,
        };

        if !slot.commit(token, report.clone()).await {
            tracing::debug!(identity = %identity, "stale poll result discarded");
            continue;
        }
        reports_published_total.fetch_add(1, Ordering::Relaxed);

        if tx.send(report).is_err() {
            let should_warn = last_no_receivers_warn
                .is_none_or(|t| t.elapsed() >= NO_RECEIVERS_WARN_INTERVAL);
            if should_warn {
                tracing::debug!(
                    operation = "broadcast_report",
                    "No active WebSocket clients; broadcast channel has no receivers"
                );
                *last_no_receivers_warn = Some(Instant::now());
            }
        }
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, operation = "get_timestamp", "system time error");
            0
        })
}
