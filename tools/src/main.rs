//! synth-runner: headless dataset generator for MFA sign-in analytics.
//!
//! Usage:
//!   synth-runner --seed 12345 --records 50000 --out dataset.csv
//!   synth-runner --format json --summary-only
//!   synth-runner --config synth.json --report stats.txt
//!   synth-runner --summary-only --report-json stats.json

use anyhow::Result;
use mfasynth_core::{
    config::{OutputFormat, SynthConfig},
    engine::SynthEngine,
    output,
};
use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut config = match str_arg(&args, "--config") {
        Some(path) => SynthConfig::load(path)?,
        None => {
            let mut c = SynthConfig::baseline();
            // Without a config file the current period is the real
            // calendar month the runner executes in.
            c.current_date = chrono::Local::now().date_naive();
            c
        }
    };

    if let Some(seed) = parse_arg::<u64>(&args, "--seed") {
        config.seed = Some(seed);
    }
    if let Some(n) = parse_arg::<usize>(&args, "--records") {
        config.record_count = n;
    }
    if let Some(n) = parse_arg::<usize>(&args, "--employees") {
        config.employee_count = n;
    }
    if let Some(n) = parse_arg::<usize>(&args, "--apps") {
        config.application_count = n;
    }
    if let Some(days) = parse_arg::<i64>(&args, "--range-days") {
        config.range_days = days;
    }
    if let Some(date) = str_arg(&args, "--current-date") {
        config.current_date = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| anyhow::anyhow!("Invalid --current-date {date}: {e}"))?;
    }
    if let Some(target) = parse_arg::<f64>(&args, "--target") {
        config.target_compliance_rate = target;
    }
    if let Some(format) = str_arg(&args, "--format") {
        config.output_format = OutputFormat::from_flag(format)
            .ok_or_else(|| anyhow::anyhow!("Unknown --format {format} (csv|tsv|json)"))?;
    }
    if has_flag(&args, "--summary-only") {
        config.summary_only = true;
    }
    if has_flag(&args, "--no-validate") {
        config.validation_enabled = false;
    }
    if has_flag(&args, "--no-correction") {
        config.correction_enabled = false;
    }

    let out_path = str_arg(&args, "--out");
    let report_path = str_arg(&args, "--report");

    eprintln!("synth-runner — MFA sign-in dataset generator");
    eprintln!("  records:      {}", config.record_count);
    eprintln!("  employees:    {}", config.employee_count);
    eprintln!("  applications: {}", config.application_count);
    eprintln!("  current date: {}", config.current_date);
    eprintln!(
        "  seed:         {}",
        config
            .seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "(wall clock)".into())
    );
    eprintln!();

    let run = SynthEngine::run(&config)?;

    if !config.summary_only {
        match out_path {
            Some(path) => {
                let file = File::create(path)?;
                let mut writer = BufWriter::new(file);
                output::write_records(&run.records, config.output_format, &mut writer)?;
                writer.flush()?;
                log::info!("wrote {} records to {path}", run.records.len());
            }
            None => {
                let stdout = io::stdout();
                let mut writer = BufWriter::new(stdout.lock());
                output::write_records(&run.records, config.output_format, &mut writer)?;
                writer.flush()?;
            }
        }
    }

    let report = output::render_report(
        &run.stats,
        run.correction.as_ref(),
        run.validation.as_ref(),
    );
    match report_path {
        Some(path) => {
            std::fs::write(path, &report)?;
            log::info!("wrote statistics report to {path}");
        }
        None if config.summary_only => {
            print!("{report}");
        }
        None => {
            eprint!("{report}");
        }
    }

    if let Some(path) = str_arg(&args, "--report-json") {
        let payload = serde_json::json!({
            "seed": run.seed,
            "stats": run.stats,
            "correction": run.correction,
            "validation": run.validation,
        });
        std::fs::write(path, serde_json::to_string_pretty(&payload)?)?;
        log::info!("wrote JSON report to {path}");
    }

    Ok(())
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}
