//! Reporter and end-to-end pipeline consistency tests.

use mfasynth_core::{config::SynthConfig, engine::SynthEngine, output};

#[test]
fn monthly_trend_accounts_for_every_record() {
    let run = SynthEngine::run(&SynthConfig::default_test()).expect("run");
    let trend_total: usize = run.stats.monthly_trend.iter().map(|m| m.events).sum();
    assert_eq!(trend_total, run.stats.total_records);
    assert_eq!(run.stats.total_records, run.records.len());
}

#[test]
fn current_period_is_the_configured_month() {
    let run = SynthEngine::run(&SynthConfig::default_test()).expect("run");
    assert_eq!(run.stats.current_period, "2025-06");
}

#[test]
fn correction_report_and_stats_agree_on_the_current_period() {
    let run = SynthEngine::run(&SynthConfig::default_test()).expect("run");
    let correction = run.correction.as_ref().expect("correction enabled");
    assert_eq!(correction.period, run.stats.current_period);
    assert_eq!(correction.period_records, run.stats.current_period_records);
    assert!(
        (correction.rate_after - run.stats.current_period_compliance_rate).abs() < 1e-9,
        "reporter must see post-correction truth"
    );
}

#[test]
fn validation_runs_the_full_check_battery() {
    let run = SynthEngine::run(&SynthConfig::default_test()).expect("run");
    let validation = run.validation.as_ref().expect("validation enabled");
    // current-month compliance, coverage, admin share, four tier shares.
    assert_eq!(validation.checks.len(), 7);
    let names: Vec<&str> = validation.checks.iter().map(|c| c.name.as_str()).collect();
    assert!(names.contains(&"current_month_compliance"));
    assert!(names.contains(&"mfa_coverage"));
    assert!(names.contains(&"admin_share"));
    assert!(names.contains(&"tier_share_critical"));
    assert_eq!(
        validation.all_passed,
        validation.checks.iter().all(|c| c.passed)
    );
}

#[test]
fn validation_and_correction_can_be_switched_off() {
    let mut config = SynthConfig::default_test();
    config.validation_enabled = false;
    config.correction_enabled = false;
    let run = SynthEngine::run(&config).expect("run");
    assert!(run.validation.is_none());
    assert!(run.correction.is_none());
}

#[test]
fn usage_buckets_cover_every_distinct_employee() {
    let run = SynthEngine::run(&SynthConfig::default_test()).expect("run");
    let bucketed: usize = run.stats.usage_buckets.iter().sum();
    assert_eq!(bucketed, run.stats.distinct_employees);
}

#[test]
fn worst_offenders_are_sorted_and_capped() {
    let run = SynthEngine::run(&SynthConfig::default_test()).expect("run");
    let offenders = &run.stats.worst_offenders;
    assert!(offenders.len() <= 10);
    for pair in offenders.windows(2) {
        assert!(
            pair[0].non_mfa_events >= pair[1].non_mfa_events,
            "offenders must be sorted by non-MFA count, descending"
        );
    }
}

#[test]
fn rendered_report_contains_every_section() {
    let run = SynthEngine::run(&SynthConfig::default_test()).expect("run");
    let text = output::render_report(
        &run.stats,
        run.correction.as_ref(),
        run.validation.as_ref(),
    );
    for section in [
        "=== DATASET SUMMARY ===",
        "=== MONTHLY TREND ===",
        "=== APPLICATIONS ===",
        "=== WORST OFFENDERS",
        "=== CORRECTION ===",
        "=== VALIDATION ===",
    ] {
        assert!(text.contains(section), "missing section {section}");
    }
}

#[test]
fn resolved_seed_is_surfaced_for_replay() {
    let mut config = SynthConfig::default_test();
    config.seed = Some(9001);
    let run = SynthEngine::run(&config).expect("run");
    assert_eq!(run.seed, 9001);

    // A missing seed still resolves to something usable.
    config.seed = None;
    let run = SynthEngine::run(&config).expect("run");
    let _ = run.seed;
}
