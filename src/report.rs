//! Plain-text QC report.
//!
//! One header line followed by `name:  value` lines, names right-aligned in
//! a 37-character column.

use anyhow::{anyhow, Result};
use std::io::Write;

use crate::stats::{Metric, QcSummary};

const NAME_WIDTH: usize = 37;

/// Write the report for `summary`, tagging it with the tool `version`.
pub fn write_report<W: Write>(writer: &mut W, summary: &QcSummary, version: &str) -> Result<()> {
    let totals = &summary.totals;
    let sex = summary.sex_call();
    let min_read_length = totals
        .min_read_length
        .map_or_else(|| "NA".to_string(), |len| len.to_string());

    writeln!(writer, "#bamqc {version}")?;

    let mut line = |name: &str, value: &dyn std::fmt::Display| -> std::io::Result<()> {
        writeln!(writer, "{name:>width$}:  {value}", width = NAME_WIDTH)
    };
    line("Total Reads", &totals.total_reads)?;
    line("Total Bases", &totals.total_bases)?;
    line("Min Read Length", &min_read_length)?;
    line("Max Read Length", &totals.max_read_length)?;
    line("Bases Deduplicated and Aligned", &totals.bases_mapped_overall)?;
    line("Known Sites", &totals.known_sites_total)?;
    line("Known Sites Covered", &totals.known_sites_covered)?;
    line("Effective Coverage", &summary.effective_coverage().display(2))?;
    line("Coverage 1X", &summary.coverage_1x().display(4))?;
    line("Mean Depth", &summary.mean_depth().display(4))?;
    line("Aligned Reads ratio", &summary.aligned_reads_ratio().display(4))?;
    line("Duplicated Reads ratio", &summary.duplicated_reads_ratio().display(4))?;
    line(
        "Sex",
        &format_args!(
            "{} ({}, {})",
            sex.sex,
            sex.xy_depth_ratio.display(2),
            Metric::Value(sex.chr_y_coverage).display(4)
        ),
    )?;

    writer.flush()?;
    Ok(())
}

/// Render the report into a string (useful for tests and snapshots).
pub fn render_report(summary: &QcSummary, version: &str) -> Result<String> {
    let mut buffer = Vec::new();
    write_report(&mut buffer, summary, version)?;
    String::from_utf8(buffer).map_err(|_| anyhow!("rendered report is not valid UTF-8"))
}
