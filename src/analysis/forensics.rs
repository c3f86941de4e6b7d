// Per-point forensics for the timeline ribbon: each consolidated point gets
// an archetype plus zero or more named issues for the tooltip. Issues are
// additive annotations; the underlying series is never mutated. A missing
// 24h reference skips the delta checks instead of failing.

use crate::analysis::nearest_within;
use crate::models::{
    ConsolidatedPoint, IssueSeverity, MS_PER_DAY, MS_PER_HOUR, PointAnalysis, PointArchetype,
    PointIssue,
};

/// Preceding samples consulted per point.
const WINDOW_LEN: usize = 5;
/// The 24h-ago reference is matched by nearest timestamp within +-1h.
pub const REFERENCE_LOOKBACK_MS: i64 = MS_PER_DAY;
pub const REFERENCE_TOLERANCE_MS: i64 = MS_PER_HOUR;

/// An uptime drop beyond this vs the preceding point is a rollback.
const ROLLBACK_TOLERANCE_SECS: f64 = 600.0;
/// Health this far below the 24h reference is a regression.
const REGRESSION_DELTA: f64 = 15.0;
const STORAGE_PRESSURE_RATIO: f64 = 0.95;
const FRESH_BOOT_SECS: f64 = 1800.0;
const ELITE_HEALTH: f64 = 95.0;
/// Credit-bearing points needed before a flat counter reads as stalled.
const CREDIT_WINDOW_MIN: usize = 3;

/// Annotates a whole series, building each point's preceding window and
/// 24h reference internally.
pub fn analyze_series(points: &[ConsolidatedPoint]) -> Vec<PointAnalysis> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let window = &points[i.saturating_sub(WINDOW_LEN)..i];
            let reference = nearest_within(
                points,
                |q| q.date as i64,
                p.date as i64 - REFERENCE_LOOKBACK_MS,
                REFERENCE_TOLERANCE_MS,
            );
            analyze_point(p, window, reference)
        })
        .collect()
}

/// Forensic verdict for one point given its short preceding window and an
/// optional ~24h-earlier reference.
pub fn analyze_point(
    target: &ConsolidatedPoint,
    window: &[ConsolidatedPoint],
    reference: Option<&ConsolidatedPoint>,
) -> PointAnalysis {
    let mut issues = Vec::new();

    let no_signal = target.health <= 0.0;
    if no_signal {
        issues.push(issue(
            "no-signal",
            IssueSeverity::Critical,
            "No health signal",
            "The node reported no health data for this period".to_string(),
        ));
    }

    let rollback = window
        .last()
        .is_some_and(|prev| target.uptime_secs + ROLLBACK_TOLERANCE_SECS < prev.uptime_secs);
    if rollback {
        issues.push(issue(
            "uptime-rollback",
            IssueSeverity::Warning,
            "Uptime rollback",
            "The uptime counter dropped since the previous point, indicating a crash or restart"
                .to_string(),
        ));
    }

    let regressed = reference
        .is_some_and(|r| r.health - target.health >= REGRESSION_DELTA && !no_signal);
    if let Some(r) = reference.filter(|_| regressed) {
        issues.push(issue(
            "health-regression",
            IssueSeverity::Warning,
            "Health below 24h baseline",
            format!(
                "Health {:.0} is well below the {:.0} reported a day earlier",
                target.health, r.health
            ),
        ));
    }

    let stalled = credit_stalled(target, window);
    if stalled {
        issues.push(issue(
            "credit-stall",
            IssueSeverity::Warning,
            "Credit accrual stalled",
            "Credits have not advanced across the recent points".to_string(),
        ));
    }

    if target.storage_committed > 0.0
        && target.storage_used / target.storage_committed >= STORAGE_PRESSURE_RATIO
    {
        issues.push(issue(
            "storage-pressure",
            IssueSeverity::Info,
            "Storage nearly full",
            format!(
                "{:.0}% of committed capacity in use",
                100.0 * target.storage_used / target.storage_committed
            ),
        ));
    }

    let fresh_boot = target.uptime_secs < FRESH_BOOT_SECS;
    if fresh_boot && !no_signal {
        issues.push(issue(
            "fresh-boot",
            IssueSeverity::Info,
            "Recently restarted",
            "Uptime is under 30 minutes; metrics are still settling".to_string(),
        ));
    }

    // Archetype: first matching tier wins.
    let archetype = if no_signal {
        PointArchetype::Critical
    } else if rollback {
        PointArchetype::Trauma
    } else if regressed || stalled {
        PointArchetype::Drift
    } else if fresh_boot {
        PointArchetype::Incubation
    } else if target.health >= ELITE_HEALTH && credits_advancing(target, window) {
        PointArchetype::Elite
    } else {
        PointArchetype::Active
    };

    PointAnalysis::new(archetype, issues)
}

fn issue(
    code: &'static str,
    severity: IssueSeverity,
    title: &'static str,
    description: String,
) -> PointIssue {
    PointIssue {
        code,
        severity,
        title,
        description,
    }
}

/// Credits present but flat across the target and a window with enough
/// credit-bearing points to make the comparison meaningful.
fn credit_stalled(target: &ConsolidatedPoint, window: &[ConsolidatedPoint]) -> bool {
    let Some(current) = target.credits else {
        return false;
    };
    let prior: Vec<f64> = window.iter().filter_map(|p| p.credits).collect();
    prior.len() >= CREDIT_WINDOW_MIN && prior.iter().all(|&c| c == current)
}

fn credits_advancing(target: &ConsolidatedPoint, window: &[ConsolidatedPoint]) -> bool {
    match (target.credits, window.iter().rev().find_map(|p| p.credits)) {
        (Some(now), Some(prev)) => now > prev,
        _ => false,
    }
}
