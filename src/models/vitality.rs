// Live vitality status and its display metadata.

use serde::Serialize;

/// Current discrete operational status, highest-priority condition first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VitalityStatus {
    Offline,
    Stagnant,
    Unstable,
    Warmup,
    Online,
}

/// Display metadata for one status. The match in [`VitalityStatus::style`]
/// is exhaustive, so a new status cannot ship without its mapping.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusStyle {
    pub label: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
}

impl VitalityStatus {
    pub fn style(self) -> StatusStyle {
        match self {
            Self::Offline => StatusStyle {
                label: "Offline",
                color: "#ef4444",
                icon: "power-off",
            },
            Self::Stagnant => StatusStyle {
                label: "Stagnant",
                color: "#a855f7",
                icon: "snowflake",
            },
            Self::Unstable => StatusStyle {
                label: "Unstable",
                color: "#f59e0b",
                icon: "activity",
            },
            Self::Warmup => StatusStyle {
                label: "Warming up",
                color: "#38bdf8",
                icon: "sunrise",
            },
            Self::Online => StatusStyle {
                label: "Online",
                color: "#22c55e",
                icon: "check-circle",
            },
        }
    }
}

/// Ephemeral classification result; recomputed on every read, never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalityResult {
    pub status: VitalityStatus,
    pub label: &'static str,
    /// Which sub-condition fired, human-readable.
    pub reason: String,
    pub confidence: u8,
}
