//! Output formatting — delimited text, JSON, and the statistics report.
//!
//! Downstream dashboard loaders expect Python-style boolean tokens, so
//! delimited text serializes booleans as `True` / `False`. JSON keeps
//! native booleans.

use crate::{
    config::OutputFormat,
    correction::CorrectionReport,
    error::SynthResult,
    report::{SummaryStats, ValidationOutcome},
    synthesizer::SignInRecord,
};
use std::io::Write;

/// Emitted column order. Loaders key on these names — append only.
pub const COLUMNS: [&str; 24] = [
    "employee_email",
    "app_name",
    "app_id",
    "signin_timestamp",
    "signin_source",
    "mfa_used",
    "event_id",
    "load_date",
    "compliant",
    "employee_name",
    "employee_id",
    "job_title",
    "manager_name",
    "manager_id",
    "manager_email",
    "company",
    "business_unit",
    "division",
    "department",
    "team",
    "subteam",
    "is_admin",
    "month_bucket",
    "report_date",
];

/// Write the record set in the requested format.
pub fn write_records<W: Write>(
    records: &[SignInRecord],
    format: OutputFormat,
    writer: &mut W,
) -> SynthResult<()> {
    match format {
        OutputFormat::Csv => write_delimited(records, ',', writer),
        OutputFormat::Tsv => write_delimited(records, '\t', writer),
        OutputFormat::Json => write_json(records, writer),
    }
}

fn write_delimited<W: Write>(
    records: &[SignInRecord],
    delimiter: char,
    writer: &mut W,
) -> SynthResult<()> {
    writeln!(writer, "{}", COLUMNS.join(&delimiter.to_string()))?;
    for record in records {
        let row = record_fields(record)
            .into_iter()
            .map(|field| escape_field(&field, delimiter))
            .collect::<Vec<_>>()
            .join(&delimiter.to_string());
        writeln!(writer, "{row}")?;
    }
    Ok(())
}

fn write_json<W: Write>(records: &[SignInRecord], writer: &mut W) -> SynthResult<()> {
    serde_json::to_writer(&mut *writer, records)?;
    writeln!(writer)?;
    Ok(())
}

/// Field values in COLUMNS order.
fn record_fields(r: &SignInRecord) -> Vec<String> {
    vec![
        r.employee_email.clone(),
        r.app_name.clone(),
        r.app_id.to_string(),
        r.signin_timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        r.signin_source.clone(),
        fmt_bool(r.mfa_used),
        r.event_id.clone(),
        r.load_date.format("%Y-%m-%d").to_string(),
        fmt_bool(r.compliant),
        r.employee_name.clone(),
        r.employee_id.clone(),
        r.job_title.clone(),
        r.manager_name.clone(),
        r.manager_id.clone(),
        r.manager_email.clone(),
        r.company.clone(),
        r.business_unit.clone(),
        r.division.clone(),
        r.department.clone(),
        r.team.clone(),
        r.subteam.clone(),
        fmt_bool(r.is_admin),
        r.month_bucket.format("%Y-%m-%d").to_string(),
        r.report_date.format("%Y-%m-%d").to_string(),
    ]
}

fn fmt_bool(value: bool) -> String {
    if value { "True".into() } else { "False".into() }
}

fn escape_field(field: &str, delimiter: char) -> String {
    if field.contains(delimiter) || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Render the human-readable statistics report.
pub fn render_report(
    stats: &SummaryStats,
    correction: Option<&CorrectionReport>,
    validation: Option<&ValidationOutcome>,
) -> String {
    let mut out = String::new();

    out.push_str("=== DATASET SUMMARY ===\n");
    out.push_str(&format!("  records:            {}\n", stats.total_records));
    out.push_str(&format!(
        "  distinct employees: {}\n",
        stats.distinct_employees
    ));
    out.push_str(&format!(
        "  mfa usage rate:     {:.1}%\n",
        stats.mfa_usage_rate * 100.0
    ));
    out.push_str(&format!(
        "  compliance rate:    {:.1}%\n",
        stats.compliance_rate * 100.0
    ));
    out.push_str(&format!(
        "  mfa coverage:       {:.1}% ({} in-scope apps)\n",
        stats.coverage * 100.0,
        stats.in_scope_applications
    ));
    out.push_str(&format!(
        "  current period:     {} ({} records, compliance {:.2}%)\n",
        stats.current_period,
        stats.current_period_records,
        stats.current_period_compliance_rate * 100.0
    ));
    out.push_str(&format!(
        "  usage buckets:      0-25%: {}  25-50%: {}  50-75%: {}  75-100%: {}\n",
        stats.usage_buckets[0],
        stats.usage_buckets[1],
        stats.usage_buckets[2],
        stats.usage_buckets[3]
    ));

    out.push_str("\n=== MONTHLY TREND ===\n");
    for m in &stats.monthly_trend {
        out.push_str(&format!(
            "  {} | events {:>6} | mfa {:>5.1}% | compliance {:>5.1}%\n",
            m.month,
            m.events,
            m.mfa_rate * 100.0,
            m.compliance_rate * 100.0
        ));
    }

    out.push_str("\n=== APPLICATIONS ===\n");
    for app in &stats.app_breakdown {
        out.push_str(&format!(
            "  [{:>3}] {:<24} {:<11} mfa_required={:<5} events {:>6} compliance {:>5.1}%\n",
            app.app_id,
            app.app_name,
            app.tier,
            app.mfa_required,
            app.events,
            app.compliance_rate * 100.0
        ));
    }

    out.push_str("\n=== WORST OFFENDERS (non-MFA sign-ins) ===\n");
    for offender in &stats.worst_offenders {
        out.push_str(&format!(
            "  {:<44} {:>5} of {:>5}\n",
            offender.employee_email, offender.non_mfa_events, offender.total_events
        ));
    }

    if let Some(c) = correction {
        out.push_str("\n=== CORRECTION ===\n");
        out.push_str(&format!("  period:           {}\n", c.period));
        out.push_str(&format!("  period records:   {}\n", c.period_records));
        out.push_str(&format!("  rate before:      {:.4}\n", c.rate_before));
        out.push_str(&format!("  target:           {:.4}\n", c.target));
        out.push_str(&format!("  records flipped:  {}\n", c.records_flipped));
        out.push_str(&format!("  rate after:       {:.4}\n", c.rate_after));
        out.push_str(&format!(
            "  within tolerance: {}\n",
            if c.within_tolerance { "yes" } else { "no" }
        ));
    }

    if let Some(v) = validation {
        out.push_str("\n=== VALIDATION ===\n");
        for c in &v.checks {
            out.push_str(&format!(
                "  [{}] {:<28} expected {:>7.4}  actual {:>7.4}  tol {:>7.4}\n",
                if c.passed { "PASS" } else { "FAIL" },
                c.name,
                c.expected,
                c.actual,
                c.tolerance
            ));
        }
        out.push_str(&format!(
            "  overall: {}\n",
            if v.all_passed { "PASS" } else { "FAIL" }
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::RiskTier;
    use chrono::{NaiveDate, NaiveDateTime};

    fn sample_record() -> SignInRecord {
        let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let timestamp: NaiveDateTime = date.and_hms_opt(9, 30, 0).unwrap();
        SignInRecord {
            event_id: "20250610-3-u-00007-0000001".into(),
            employee_email: "mara.voss@meridianops.example.com".into(),
            employee_id: "u-00007".into(),
            employee_name: "Mara Voss".into(),
            job_title: "Data Analyst".into(),
            manager_id: "u-00000".into(),
            manager_name: "Erik Olsen".into(),
            manager_email: "erik.olsen@meridianops.example.com".into(),
            company: "Meridian Operations".into(),
            business_unit: "Revenue".into(),
            division: "Sales".into(),
            department: "Enterprise Sales".into(),
            team: "Team Echo".into(),
            subteam: String::new(),
            is_admin: false,
            app_id: 3,
            app_name: "VPN Gateway".into(),
            app_tier: RiskTier::Critical,
            app_mfa_required: true,
            signin_timestamp: timestamp,
            signin_source: "Web Portal".into(),
            mfa_used: true,
            compliant: true,
            month_bucket: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            load_date: date,
            report_date: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
        }
    }

    #[test]
    fn csv_uses_python_boolean_tokens() {
        let mut buffer = Vec::new();
        write_records(&[sample_record()], OutputFormat::Csv, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("employee_email,app_name,app_id"));
        assert!(lines[1].contains(",True,"));
        assert!(lines[1].contains(",False,"));
        assert!(!lines[1].contains(",true,"));
    }

    #[test]
    fn header_matches_column_count() {
        let fields = record_fields(&sample_record());
        assert_eq!(fields.len(), COLUMNS.len());
    }

    #[test]
    fn fields_containing_the_delimiter_are_quoted() {
        let mut record = sample_record();
        record.app_name = "Ledger, Prime".into();
        let mut buffer = Vec::new();
        write_records(&[record], OutputFormat::Csv, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("\"Ledger, Prime\""));
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        assert_eq!(
            escape_field("say \"hi\"", ','),
            "\"say \"\"hi\"\"\""
        );
    }

    #[test]
    fn tsv_uses_tab_delimiter() {
        let mut buffer = Vec::new();
        write_records(&[sample_record()], OutputFormat::Tsv, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.lines().next().unwrap().contains('\t'));
    }

    #[test]
    fn json_round_trips_with_native_booleans() {
        let mut buffer = Vec::new();
        write_records(&[sample_record()], OutputFormat::Json, &mut buffer).unwrap();
        let parsed: Vec<SignInRecord> =
            serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].mfa_used);
        let raw = String::from_utf8(buffer).unwrap();
        assert!(raw.contains("\"mfa_used\":true"));
    }
}
