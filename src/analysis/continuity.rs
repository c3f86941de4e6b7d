// Session continuity: reset frequency over the trailing ~30-day window,
// combined with the live vitality status, mapped to a qualitative label.

use crate::analysis::count_resets;
use crate::models::{ContinuityLabel, ContinuityReport, NodeSnapshot, VitalityStatus};

/// Uptime drops below this are clock jitter, not resets.
pub const RESET_TOLERANCE_SECS: u64 = 600;

/// Up to this many resets in the window still reads "Operational".
const MINOR_RESET_MAX: u32 = 4;

pub fn analyze(
    history: &[NodeSnapshot],
    live: &NodeSnapshot,
    status: VitalityStatus,
) -> ContinuityReport {
    let (reset_count, last_reset) = count_resets(history, RESET_TOLERANCE_SECS);

    let (label, detail) = match (status, reset_count) {
        (VitalityStatus::Stagnant, _) => {
            (ContinuityLabel::Suspended, frozen_since(history, live))
        }
        (VitalityStatus::Warmup, 0) => {
            (ContinuityLabel::Initializing, "System stabilizing".to_string())
        }
        (VitalityStatus::Warmup, n) => {
            (ContinuityLabel::Rebooting, format!("Recovering (Resets: {n})"))
        }
        (VitalityStatus::Online, 0) => {
            (ContinuityLabel::Seamless, "No interruptions (30d)".to_string())
        }
        (VitalityStatus::Online, n) if n <= MINOR_RESET_MAX => (
            ContinuityLabel::Operational,
            format!("Minor resets detected ({n})"),
        ),
        (VitalityStatus::Online, n) => {
            (ContinuityLabel::Volatile, format!("High frequency ({n})"))
        }
        _ => (ContinuityLabel::Unverified, "Signal lost".to_string()),
    };

    ContinuityReport {
        label,
        detail,
        reset_count,
        last_reset,
    }
}

/// The first moment the counter stopped advancing: earliest sample whose
/// uptime equals the live uptime.
fn frozen_since(history: &[NodeSnapshot], live: &NodeSnapshot) -> String {
    history
        .iter()
        .find(|s| s.uptime_secs == live.uptime_secs)
        .map(|s| format!("Frozen since {}", format_ts(s.timestamp)))
        .unwrap_or_else(|| "Uptime counter frozen".to_string())
}

fn format_ts(ms: u64) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(ms as i64)
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| format!("t+{ms}ms"))
}
