// Consolidated point: one row per display bucket, numeric fields averaged.

use serde::{Deserialize, Serialize};

/// Output of the consolidator. For raw pass-through each point wraps a
/// single sample; for hourly/daily buckets every numeric field is the
/// average of the raw rows falling in the bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedPoint {
    /// Bucket boundary (or the raw sample timestamp), epoch milliseconds.
    pub date: u64,
    pub health: f64,
    pub uptime_secs: f64,
    pub storage_committed: f64,
    pub storage_used: f64,
    /// None when no sample in the bucket carried credits.
    pub credits: Option<f64>,
    /// None when no sample in the bucket carried a rank.
    pub rank: Option<f64>,
    /// Raw rows behind this point.
    pub samples: u32,
}
