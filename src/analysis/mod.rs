// Classification engine: pure, synchronous functions over already-fetched
// windows. No I/O and no shared state; callers recompute on every read.

pub mod continuity;
pub mod forensics;
pub mod vitality;

use crate::models::NodeSnapshot;

/// Nearest item to `target_ts` within `tolerance_ms`, by the caller's
/// timestamp accessor. The earlier item wins an exact distance tie, so the
/// match is deterministic on sparse or duplicated cadences.
pub(crate) fn nearest_within<T>(
    items: &[T],
    ts_of: impl Fn(&T) -> i64,
    target_ts: i64,
    tolerance_ms: i64,
) -> Option<&T> {
    let mut best: Option<(&T, i64)> = None;
    for item in items {
        let dist = (ts_of(item) - target_ts).abs();
        if dist > tolerance_ms {
            continue;
        }
        match best {
            Some((_, d)) if dist >= d => {}
            _ => best = Some((item, dist)),
        }
    }
    best.map(|(item, _)| item)
}

/// Pairwise uptime scan: a drop larger than `tolerance_secs` between
/// consecutive samples is a reset. Returns the count and the timestamp of
/// the most recent reset. Smaller drops are clock jitter, not resets.
pub(crate) fn count_resets(samples: &[NodeSnapshot], tolerance_secs: u64) -> (u32, Option<u64>) {
    let mut count = 0u32;
    let mut last_reset = None;
    for pair in samples.windows(2) {
        if pair[1].uptime_secs + tolerance_secs < pair[0].uptime_secs {
            count += 1;
            last_reset = Some(pair[1].timestamp);
        }
    }
    (count, last_reset)
}

/// Trailing suffix of an ascending window: samples with timestamp >= cutoff.
pub(crate) fn trailing<'a>(samples: &'a [NodeSnapshot], cutoff_ms: u64) -> &'a [NodeSnapshot] {
    let start = samples.partition_point(|s| s.timestamp < cutoff_ms);
    &samples[start..]
}
