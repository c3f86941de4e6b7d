// Downsampling to display resolution. Pure and total: no I/O, no errors,
// empty in -> empty out. Buckets come from the sample's own timestamp
// truncated to the bucket boundary; days with no samples produce no bucket.

use std::collections::BTreeMap;

use crate::models::{ConsolidatedPoint, NodeSnapshot, TimeRange};

/// Reduces sample density for one display range. Granularity is decided by
/// the range alone (raw for 24H, hourly for 3D/7D, daily for 30D/ALL).
/// Never reorders, never interpolates missing buckets.
pub fn consolidate(samples: &[NodeSnapshot], range: TimeRange) -> Vec<ConsolidatedPoint> {
    match range.granularity().bucket_ms() {
        None => samples.iter().map(raw_point).collect(),
        Some(bucket_ms) => bucketed(samples, bucket_ms),
    }
}

fn raw_point(s: &NodeSnapshot) -> ConsolidatedPoint {
    ConsolidatedPoint {
        date: s.timestamp,
        health: s.health as f64,
        uptime_secs: s.uptime_secs as f64,
        storage_committed: s.storage_committed as f64,
        storage_used: s.storage_used as f64,
        credits: s.credits.map(|c| c as f64),
        rank: s.rank.map(|r| r as f64),
        samples: 1,
    }
}

fn bucketed(samples: &[NodeSnapshot], bucket_ms: i64) -> Vec<ConsolidatedPoint> {
    if samples.is_empty() || bucket_ms <= 0 {
        return samples.iter().map(raw_point).collect();
    }
    let mut by_bucket: BTreeMap<i64, Vec<&NodeSnapshot>> = BTreeMap::new();
    for s in samples {
        let bucket = (s.timestamp as i64 / bucket_ms) * bucket_ms;
        by_bucket.entry(bucket).or_default().push(s);
    }
    by_bucket
        .into_iter()
        .map(|(start, refs)| average_bucket(start, &refs))
        .collect()
}

/// Every numeric field averaged independently; optional fields average
/// over the samples that carry them.
fn average_bucket(bucket_start: i64, refs: &[&NodeSnapshot]) -> ConsolidatedPoint {
    ConsolidatedPoint {
        date: bucket_start as u64,
        health: mean_f64(refs.iter().map(|s| s.health as f64)),
        uptime_secs: mean_f64(refs.iter().map(|s| s.uptime_secs as f64)),
        storage_committed: mean_f64(refs.iter().map(|s| s.storage_committed as f64)),
        storage_used: mean_f64(refs.iter().map(|s| s.storage_used as f64)),
        credits: mean_present(refs.iter().map(|s| s.credits)),
        rank: mean_present(refs.iter().map(|s| s.rank.map(u64::from))),
        samples: refs.len() as u32,
    }
}

fn mean_f64(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut n = 0u32;
    for v in values {
        sum += v;
        n += 1;
    }
    if n == 0 { 0.0 } else { sum / n as f64 }
}

fn mean_present(values: impl Iterator<Item = Option<u64>>) -> Option<f64> {
    let mut sum = 0.0;
    let mut n = 0u32;
    for v in values.flatten() {
        sum += v as f64;
        n += 1;
    }
    if n == 0 { None } else { Some(sum / n as f64) }
}
