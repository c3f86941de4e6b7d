// Live vitality classifier: a five-level priority waterfall, first match
// wins. Stateless; re-run on every read. Absent history only prevents the
// history-dependent levels from matching, it never raises an error.

use crate::analysis::{count_resets, nearest_within, trailing};
use crate::models::{NodeSnapshot, VitalityResult, VitalityStatus};

const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_HOUR: u64 = 3_600_000;

/// Below this uptime a node is still warming up.
pub const WARMUP_UPTIME_SECS: u64 = 1800;

/// Minutes of silence after which a node is flat-out offline.
const OFFLINE_SILENCE_MIN: u64 = 120;
/// A fresh boot that also reports late is offline, not warming up.
const BOOT_SILENCE_MIN: u64 = 45;
const BOOT_UPTIME_SECS: u64 = 300;
/// Minutes of silence that alone make a node unstable.
const LATE_SILENCE_MIN: u64 = 30;

/// Restart counting window and drop threshold (distinct from the 600s
/// continuity tolerance: here a 60s drop already counts).
const RESTART_WINDOW_MS: u64 = 24 * MS_PER_HOUR;
const RESTART_DROP_SECS: u64 = 60;
const VOLATILE_RESTARTS: u32 = 5;

/// Frozen detection: uptime unchanged (+-60s) vs a sample ~1h ago.
const FROZEN_LOOKBACK_MS: i64 = MS_PER_HOUR as i64;
const FROZEN_TOLERANCE_MS: i64 = 30 * MS_PER_MINUTE as i64;
const FROZEN_DELTA_SECS: u64 = 60;
const FROZEN_MIN_UPTIME_SECS: u64 = 1000;

/// Ghosting: share of no-signal samples over the trailing 6h window.
const GHOST_WINDOW_MS: u64 = 6 * MS_PER_HOUR;
const GHOST_MIN_SAMPLES: usize = 5;
const GHOST_RATIO: f64 = 0.8;

/// Classifies the current state of one node from its live snapshot and the
/// trailing (un-consolidated) history window, ascending by timestamp.
pub fn classify(live: &NodeSnapshot, history: &[NodeSnapshot], now_ms: u64) -> VitalityResult {
    let since_seen_min = now_ms.saturating_sub(live.timestamp) / MS_PER_MINUTE;
    let uptime = live.uptime_secs;

    // Level 1: data absence dominates everything else, including staleness
    // and a frozen counter.
    if since_seen_min > OFFLINE_SILENCE_MIN {
        return result(
            VitalityStatus::Offline,
            format!("Signal lost: last seen {since_seen_min}m ago"),
            100,
        );
    }
    if let Some(ratio) = ghost_ratio(history, now_ms) {
        return result(
            VitalityStatus::Offline,
            format!(
                "Ghosting: {:.0}% empty health signals over 6h",
                ratio * 100.0
            ),
            100,
        );
    }
    if since_seen_min > BOOT_SILENCE_MIN && uptime < BOOT_UPTIME_SECS {
        return result(
            VitalityStatus::Offline,
            format!("Silent boot: last seen {since_seen_min}m ago at {uptime}s uptime"),
            100,
        );
    }

    // Level 2: reporting, but the uptime counter stopped advancing.
    if is_frozen(live, history, now_ms) {
        return result(
            VitalityStatus::Stagnant,
            format!("Uptime counter frozen at {uptime}s for over an hour"),
            95,
        );
    }

    // Level 3: volatile or late. A single recent boot alone never lands
    // here; it takes frequent restarts or a late report.
    let restarts = restart_count(history, now_ms);
    if restarts > VOLATILE_RESTARTS {
        return result(
            VitalityStatus::Unstable,
            format!("High volatility: {restarts} restarts detected"),
            85,
        );
    }
    if since_seen_min > LATE_SILENCE_MIN {
        return result(
            VitalityStatus::Unstable,
            format!("High latency: last seen {since_seen_min}m ago"),
            85,
        );
    }

    // Level 4: freshly booted.
    if uptime < WARMUP_UPTIME_SECS {
        return result(
            VitalityStatus::Warmup,
            format!("Fresh boot: {uptime}s uptime"),
            100,
        );
    }

    result(
        VitalityStatus::Online,
        "Reporting on schedule".to_string(),
        100,
    )
}

fn result(status: VitalityStatus, reason: String, confidence: u8) -> VitalityResult {
    VitalityResult {
        status,
        label: status.style().label,
        reason,
        confidence,
    }
}

/// Resets in the trailing 24h of the window: consecutive drops > 60s.
fn restart_count(history: &[NodeSnapshot], now_ms: u64) -> u32 {
    let recent = trailing(history, now_ms.saturating_sub(RESTART_WINDOW_MS));
    count_resets(recent, RESTART_DROP_SECS).0
}

/// True when a sample ~1h ago exists and the counter has barely moved
/// since, on a node that has been up long enough for that to be abnormal.
fn is_frozen(live: &NodeSnapshot, history: &[NodeSnapshot], now_ms: u64) -> bool {
    let target = now_ms as i64 - FROZEN_LOOKBACK_MS;
    let Some(earlier) = nearest_within(history, |s| s.timestamp as i64, target, FROZEN_TOLERANCE_MS)
    else {
        return false;
    };
    live.uptime_secs > FROZEN_MIN_UPTIME_SECS
        && live.uptime_secs.abs_diff(earlier.uptime_secs) < FROZEN_DELTA_SECS
}

/// Some(ratio) when more than 80% of the trailing-6h samples report no
/// health signal. Needs more than 5 samples to say anything at all.
fn ghost_ratio(history: &[NodeSnapshot], now_ms: u64) -> Option<f64> {
    let recent = trailing(history, now_ms.saturating_sub(GHOST_WINDOW_MS));
    if recent.len() <= GHOST_MIN_SAMPLES {
        return None;
    }
    let silent = recent.iter().filter(|s| !s.has_signal()).count();
    let ratio = silent as f64 / recent.len() as f64;
    (ratio > GHOST_RATIO).then_some(ratio)
}
