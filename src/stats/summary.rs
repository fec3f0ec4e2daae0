use super::metrics::effective_coverage;
use super::sex::{call_sex, xy_depth_ratio};
use super::{Metric, RunningTotals, SexCall, SexThresholds};
use crate::coverage::BufferLedger;

/// Bases and contig length for one sex chromosome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct ChromosomeDepth {
    /// Read bases counted on the chromosome
    pub bases: u64,
    /// Contig length, when the stream reached the chromosome
    pub length: Option<usize>,
}

impl ChromosomeDepth {
    /// Mean depth, 0 when the chromosome was never reached.
    pub fn depth(&self) -> f64 {
        match self.length {
            Some(len) if len > 0 => self.bases as f64 / len as f64,
            _ => 0.0,
        }
    }
}

/// Final state of a QC run, with derived metrics computed on demand.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct QcSummary {
    /// Accumulated counters
    pub totals: RunningTotals,
    /// Sum of all header contig lengths
    pub genome_length: u64,
    /// chrX bases and length
    pub chr_x: ChromosomeDepth,
    /// chrY bases and length
    pub chr_y: ChromosomeDepth,
    /// Covered fraction of the restricted chrY window (0 if chrY had no coverage)
    pub chr_y_restricted_coverage: f64,
    /// Thresholds used for the sex call
    pub sex_thresholds: SexThresholds,
    /// Coverage-buffer accounting
    pub ledger: BufferLedger,
}

impl QcSummary {
    /// `-ln(1 - covered/total)` over known sites.
    pub fn effective_coverage(&self) -> Metric {
        effective_coverage(self.totals.known_sites_covered, self.totals.known_sites_total)
    }

    /// Fraction of the genome covered at least once.
    pub fn coverage_1x(&self) -> Metric {
        Metric::ratio(self.totals.overall_sites_covered, self.genome_length)
    }

    /// Aligned, deduplicated bases per genome position.
    pub fn mean_depth(&self) -> Metric {
        Metric::ratio(self.totals.bases_mapped_overall, self.genome_length)
    }

    /// Aligned reads / total reads.
    pub fn aligned_reads_ratio(&self) -> Metric {
        Metric::ratio(self.totals.aligned_reads, self.totals.total_reads)
    }

    /// Duplicated reads / total reads.
    pub fn duplicated_reads_ratio(&self) -> Metric {
        Metric::ratio(self.totals.duplicated_reads, self.totals.total_reads)
    }

    /// chrX depth / chrY depth.
    pub fn xy_depth_ratio(&self) -> Metric {
        xy_depth_ratio(self.chr_x.depth(), self.chr_y.depth())
    }

    /// Sex call from depth ratio and restricted chrY coverage.
    pub fn sex_call(&self) -> SexCall {
        let xy_ratio = self.xy_depth_ratio();
        let overall = self.coverage_1x().value().unwrap_or(0.0);
        SexCall {
            sex: call_sex(
                xy_ratio,
                overall,
                self.chr_y_restricted_coverage,
                &self.sex_thresholds,
            ),
            xy_depth_ratio: xy_ratio,
            chr_y_coverage: self.chr_y_restricted_coverage,
        }
    }
}
