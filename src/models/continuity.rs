// Session continuity: qualitative stability label from reset frequency.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContinuityLabel {
    Seamless,
    Operational,
    Volatile,
    Rebooting,
    Initializing,
    Suspended,
    Unverified,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinuityReport {
    pub label: ContinuityLabel,
    pub detail: String,
    /// Uptime-counter resets detected in the analyzed window.
    pub reset_count: u32,
    /// Timestamp of the most recent reset, epoch milliseconds.
    pub last_reset: Option<u64>,
}
