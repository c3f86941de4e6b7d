// Per-point archetypes for the timeline ribbon, plus the issue annotations
// shown in tooltips.

use serde::Serialize;

/// Classification of a single historical point. Distinct from the live
/// vitality status: archetypes annotate the ribbon, vitality is "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PointArchetype {
    Critical,
    Trauma,
    Drift,
    Incubation,
    Elite,
    Active,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchetypeStyle {
    pub label: &'static str,
    pub color: &'static str,
}

impl PointArchetype {
    pub fn style(self) -> ArchetypeStyle {
        match self {
            Self::Critical => ArchetypeStyle {
                label: "Critical",
                color: "#ef4444",
            },
            Self::Trauma => ArchetypeStyle {
                label: "Trauma",
                color: "#f97316",
            },
            Self::Drift => ArchetypeStyle {
                label: "Drift",
                color: "#eab308",
            },
            Self::Incubation => ArchetypeStyle {
                label: "Incubation",
                color: "#38bdf8",
            },
            Self::Elite => ArchetypeStyle {
                label: "Elite",
                color: "#14b8a6",
            },
            Self::Active => ArchetypeStyle {
                label: "Active",
                color: "#22c55e",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Critical,
    Warning,
    Info,
}

/// One named finding on a point. Issues are additive annotations; they
/// never mutate the underlying sample.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointIssue {
    pub code: &'static str,
    pub severity: IssueSeverity,
    pub title: &'static str,
    pub description: String,
}

/// Forensic verdict for one point: archetype, findings, tooltip headline.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointAnalysis {
    pub archetype: PointArchetype,
    pub issues: Vec<PointIssue>,
    /// Always set: an issue-free point reads "All systems operational",
    /// never an empty state.
    pub summary: String,
}

impl PointAnalysis {
    pub fn new(archetype: PointArchetype, issues: Vec<PointIssue>) -> Self {
        let summary = if issues.is_empty() {
            "All systems operational".to_string()
        } else {
            issues
                .iter()
                .map(|i| i.title)
                .collect::<Vec<_>>()
                .join("; ")
        };
        Self {
            archetype,
            issues,
            summary,
        }
    }
}
