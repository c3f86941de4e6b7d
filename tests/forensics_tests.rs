// Point forensics tests: archetypes, issue catalog, 24h reference handling

use fleetpulse::analysis::forensics::{analyze_point, analyze_series};
use fleetpulse::models::{
    ConsolidatedPoint, IssueSeverity, MS_PER_DAY, MS_PER_HOUR, PointArchetype,
};

const BASE: u64 = 1_750_000_000_000;

fn point(date: u64, health: f64, uptime_secs: f64) -> ConsolidatedPoint {
    ConsolidatedPoint {
        date,
        health,
        uptime_secs,
        storage_committed: 1_000_000.0,
        storage_used: 250_000.0,
        // Advancing credits keep healthy fixtures off the stall path.
        credits: Some(1_000.0 + (date / 1_000_000) as f64),
        rank: Some(42.0),
        samples: 1,
    }
}

fn hourly_window(len: usize, health: f64) -> Vec<ConsolidatedPoint> {
    (0..len)
        .map(|i| point(BASE + i as u64 * MS_PER_HOUR as u64, health, 100_000.0))
        .collect()
}

#[test]
fn test_healthy_point_is_active_with_operational_summary() {
    let window = hourly_window(5, 90.0);
    let target = point(BASE + 5 * MS_PER_HOUR as u64, 90.0, 100_000.0);
    let analysis = analyze_point(&target, &window, None);
    assert_eq!(analysis.archetype, PointArchetype::Active);
    assert!(analysis.issues.is_empty());
    assert_eq!(analysis.summary, "All systems operational");
}

#[test]
fn test_no_signal_is_critical() {
    let window = hourly_window(3, 90.0);
    let target = point(BASE + 3 * MS_PER_HOUR as u64, 0.0, 100_000.0);
    let analysis = analyze_point(&target, &window, None);
    assert_eq!(analysis.archetype, PointArchetype::Critical);
    let issue = &analysis.issues[0];
    assert_eq!(issue.code, "no-signal");
    assert_eq!(issue.severity, IssueSeverity::Critical);
}

#[test]
fn test_uptime_rollback_is_trauma() {
    let window = hourly_window(4, 90.0);
    let target = point(BASE + 4 * MS_PER_HOUR as u64, 90.0, 500.0);
    let analysis = analyze_point(&target, &window, None);
    assert_eq!(analysis.archetype, PointArchetype::Trauma);
    assert!(analysis.issues.iter().any(|i| i.code == "uptime-rollback"));
}

#[test]
fn test_health_regression_against_24h_reference_is_drift() {
    let reference = point(BASE, 90.0, 100_000.0);
    let target = point(BASE + MS_PER_DAY as u64, 70.0, 200_000.0);
    let analysis = analyze_point(&target, &[], Some(&reference));
    assert_eq!(analysis.archetype, PointArchetype::Drift);
    assert!(analysis.issues.iter().any(|i| i.code == "health-regression"));
}

#[test]
fn test_missing_reference_skips_delta_checks() {
    // Same degraded point, no reference: the 24h comparison is skipped
    // gracefully instead of failing.
    let target = point(BASE + MS_PER_DAY as u64, 70.0, 200_000.0);
    let analysis = analyze_point(&target, &[], None);
    assert!(
        analysis.issues.iter().all(|i| i.code != "health-regression"),
        "issues: {:?}",
        analysis.issues
    );
    assert_eq!(analysis.archetype, PointArchetype::Active);
}

#[test]
fn test_flat_credits_are_a_stall() {
    let mut window = hourly_window(4, 90.0);
    for p in &mut window {
        p.credits = Some(7_000.0);
    }
    let mut target = point(BASE + 4 * MS_PER_HOUR as u64, 90.0, 120_000.0);
    target.credits = Some(7_000.0);
    let analysis = analyze_point(&target, &window, None);
    assert_eq!(analysis.archetype, PointArchetype::Drift);
    assert!(analysis.issues.iter().any(|i| i.code == "credit-stall"));
}

#[test]
fn test_fresh_boot_is_incubation() {
    let target = point(BASE, 90.0, 900.0);
    let analysis = analyze_point(&target, &[], None);
    assert_eq!(analysis.archetype, PointArchetype::Incubation);
    assert!(analysis.issues.iter().any(|i| i.code == "fresh-boot"));
}

#[test]
fn test_top_health_with_advancing_credits_is_elite() {
    let window = hourly_window(5, 96.0);
    let mut target = point(BASE + 5 * MS_PER_HOUR as u64, 96.0, 120_000.0);
    target.credits = Some(window.last().unwrap().credits.unwrap() + 50.0);
    let analysis = analyze_point(&target, &window, None);
    assert_eq!(analysis.archetype, PointArchetype::Elite);
    assert!(analysis.issues.is_empty());
}

#[test]
fn test_storage_pressure_is_informational_only() {
    let window = hourly_window(5, 90.0);
    let mut target = point(BASE + 5 * MS_PER_HOUR as u64, 90.0, 120_000.0);
    target.storage_used = 960_000.0;
    let analysis = analyze_point(&target, &window, None);
    let issue = analysis
        .issues
        .iter()
        .find(|i| i.code == "storage-pressure")
        .expect("storage-pressure issue");
    assert_eq!(issue.severity, IssueSeverity::Info);
    assert_eq!(analysis.archetype, PointArchetype::Active);
}

#[test]
fn test_series_matches_reference_a_day_back() {
    // 25 hourly points; the last one sits exactly 24h after the first and
    // has degraded health, so the series pass flags a regression.
    let mut points = hourly_window(25, 90.0);
    points[24].health = 60.0;
    let analyses = analyze_series(&points);
    assert_eq!(analyses.len(), 25);
    let last = &analyses[24];
    assert_eq!(last.archetype, PointArchetype::Drift);
    assert!(last.issues.iter().any(|i| i.code == "health-regression"));
    // Early points have no 24h-ago neighbor and no findings.
    assert_eq!(analyses[1].archetype, PointArchetype::Active);
    assert!(analyses[1].issues.is_empty());
}

#[test]
fn test_empty_series_yields_empty_analyses() {
    assert!(analyze_series(&[]).is_empty());
}

#[test]
fn test_every_archetype_has_display_metadata() {
    let all = [
        PointArchetype::Critical,
        PointArchetype::Trauma,
        PointArchetype::Drift,
        PointArchetype::Incubation,
        PointArchetype::Elite,
        PointArchetype::Active,
    ];
    for archetype in all {
        let style = archetype.style();
        assert!(!style.label.is_empty());
        assert!(style.color.starts_with('#'));
    }
}
