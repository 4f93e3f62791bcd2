use std::fmt::Write as _;

use vigil_core::{DETAIL_LIMIT, ProbeReport, truncate_detail};

use crate::cli::OutputFormat;

/// Render a probe report to a string in the requested format.
pub fn render(report: &ProbeReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => Ok(render_text(report)),
    }
}

/// Print a probe report in the requested format.
pub fn print_report(report: &ProbeReport, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(report, format)?;
    println!("{rendered}");
    Ok(())
}

fn render_text(report: &ProbeReport) -> String {
    let mut out = String::new();
    for outcome in report.outcomes() {
        let _ = writeln!(
            out,
            "{} {}: {}",
            outcome.status.icon(),
            outcome.component,
            outcome.status
        );
        if !outcome.detail.is_empty() {
            let _ = writeln!(out, "   {}", truncate_detail(&outcome.detail, DETAIL_LIMIT));
        }
    }

    let _ = write!(
        out,
        "\nSUMMARY: {} ok, {} failed, {} skipped",
        report.ok_count(),
        report.fail_count(),
        report.skip_count()
    );
    if !report.all_passed() {
        let failed: Vec<&str> = report.failures().map(|o| o.component.as_str()).collect();
        let _ = write!(out, "\nFailed: {}", failed.join(", "));
    }
    out
}
