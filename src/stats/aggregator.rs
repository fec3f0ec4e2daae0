use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::summary::ChromosomeDepth;
use super::{QcSummary, RunningTotals};
use crate::alignment::{AlignmentRecord, ContigTable};
use crate::config::{ContigRole, QcConfig, SortPolicy};
use crate::coverage::{BufferLedger, CoverageBuffer};
use crate::sites::{CoverageJoiner, KnownSitesIndex, SiteProvider};
use crate::QcError;

/// Contig the stream is currently inside.
#[derive(Debug)]
struct OpenContig {
    name: Arc<str>,
    length: usize,
    role: ContigRole,
    /// Allocated on the first aligned read.
    buffer: Option<CoverageBuffer>,
}

/// Streaming driver: classifies records, marks coverage and joins each
/// contig's coverage with its known sites when the contig is left.
///
/// At most one coverage buffer is alive at a time; it is dropped as soon as
/// its contig has been joined.
#[derive(Debug)]
pub struct StatisticsAggregator<'a, P> {
    config: &'a QcConfig,
    index: KnownSitesIndex,
    joiner: CoverageJoiner<P>,
    contigs: ContigTable,
    totals: RunningTotals,
    ledger: BufferLedger,
    open: Option<OpenContig>,
    visited: HashSet<Arc<str>>,
    chr_x_length: Option<usize>,
    chr_y_length: Option<usize>,
    /// Set by the first chrY visit that produced coverage; revisits keep it.
    chr_y_restricted_coverage: Option<f64>,
}

impl<'a, P: SiteProvider> StatisticsAggregator<'a, P> {
    /// Create an aggregator for a stream with the given header contigs.
    pub fn new(
        config: &'a QcConfig,
        index: KnownSitesIndex,
        provider: P,
        contigs: ContigTable,
    ) -> Self {
        Self {
            config,
            index,
            joiner: CoverageJoiner::new(provider),
            contigs,
            totals: RunningTotals::default(),
            ledger: BufferLedger::new(),
            open: None,
            visited: HashSet::new(),
            chr_x_length: None,
            chr_y_length: None,
            chr_y_restricted_coverage: None,
        }
    }

    /// Counters so far.
    pub fn totals(&self) -> &RunningTotals {
        &self.totals
    }

    /// Buffer accounting so far.
    pub fn ledger(&self) -> &BufferLedger {
        &self.ledger
    }

    /// Fold one record into the running state.
    pub fn observe(&mut self, record: &AlignmentRecord) -> Result<(), QcError> {
        if record.contig_name() != self.current_contig() {
            self.switch_contig(record.contig.as_ref())?;
        }

        let read_length = u64::from(record.read_length);
        match self.open.as_ref().map(|open| open.role) {
            Some(ContigRole::X) => self.totals.bases_mapped_chr_x += read_length,
            Some(ContigRole::Y) => self.totals.bases_mapped_chr_y += read_length,
            _ => {}
        }

        let flags = record.flags;
        if flags.secondary_or_supplementary {
            self.totals.secondary_alignments += 1;
            if !self.config.count_secondary_reads {
                return Ok(());
            }
        }

        self.totals.record_read(record.read_length);

        if flags.duplicate {
            self.totals.duplicated_reads += 1;
            return Ok(());
        }
        if flags.unmapped {
            return Ok(());
        }

        self.totals.aligned_reads += 1;
        self.mark_coverage(record);
        Ok(())
    }

    /// Finalize the last contig, count known sites of contigs that never
    /// produced coverage, and produce the summary.
    pub fn finish(mut self) -> Result<QcSummary, QcError> {
        self.finalize_open()?;

        for (chrom, sources) in self.index.drain_remaining() {
            self.totals.known_sites_total += self.joiner.join_remainder(&chrom, &sources)?;
        }

        info!(
            total_reads = self.totals.total_reads,
            aligned_reads = self.totals.aligned_reads,
            known_sites = self.totals.known_sites_total,
            known_sites_covered = self.totals.known_sites_covered,
            buffers = self.ledger.allocations(),
            peak_buffer_slots = self.ledger.peak_slots(),
            "streaming pass complete"
        );

        Ok(QcSummary {
            genome_length: self.contigs.genome_length(),
            chr_x: ChromosomeDepth {
                bases: self.totals.bases_mapped_chr_x,
                length: self.chr_x_length,
            },
            chr_y: ChromosomeDepth {
                bases: self.totals.bases_mapped_chr_y,
                length: self.chr_y_length,
            },
            chr_y_restricted_coverage: self.chr_y_restricted_coverage.unwrap_or(0.0),
            sex_thresholds: self.config.sex_thresholds,
            ledger: self.ledger,
            totals: self.totals,
        })
    }

    fn current_contig(&self) -> Option<&str> {
        self.open.as_ref().map(|open| open.name.as_ref())
    }

    fn switch_contig(&mut self, next: Option<&Arc<str>>) -> Result<(), QcError> {
        self.finalize_open()?;

        let Some(name) = next else {
            debug!("entering unplaced reads");
            return Ok(());
        };
        let length = self
            .contigs
            .length(name)
            .ok_or_else(|| QcError::UnknownContig(name.to_string()))?;

        if !self.visited.insert(Arc::clone(name)) {
            match self.config.sort_policy {
                SortPolicy::Strict => {
                    return Err(QcError::UnsortedInput {
                        contig: name.to_string(),
                    })
                }
                SortPolicy::Warn => warn!(
                    contig = %name,
                    "alignment stream revisits contig; input is not coordinate-sorted"
                ),
            }
        }

        let role = self.config.sex_chromosomes.role(name);
        match role {
            ContigRole::X => self.chr_x_length = Some(length),
            ContigRole::Y => self.chr_y_length = Some(length),
            ContigRole::Other => {}
        }

        debug!(contig = %name, length, ?role, "entering contig");
        self.open = Some(OpenContig {
            name: Arc::clone(name),
            length,
            role,
            buffer: None,
        });
        Ok(())
    }

    fn mark_coverage(&mut self, record: &AlignmentRecord) {
        let Some(open) = self.open.as_mut() else {
            return;
        };
        let start = record.start.max(1);
        let end = record.end.min(open.length as u64);
        if start > end {
            return;
        }

        if open.buffer.is_none() {
            self.ledger.allocate(open.length + 1);
            open.buffer = Some(CoverageBuffer::new(open.length));
        }
        if let Some(buffer) = open.buffer.as_mut() {
            self.totals.bases_mapped_overall += buffer.mark_range(start as usize, end as usize);
        }
    }

    fn finalize_open(&mut self) -> Result<(), QcError> {
        let Some(OpenContig {
            name,
            length,
            role,
            buffer,
        }) = self.open.take()
        else {
            return Ok(());
        };
        let Some(buffer) = buffer else {
            debug!(contig = %name, "no coverage; known sites left for remainder pass");
            return Ok(());
        };

        if let Some(sources) = self.index.take(&name) {
            let delta = self.joiner.join(&name, &buffer, &sources)?;
            self.totals.known_sites_total += delta.total;
            self.totals.known_sites_covered += delta.covered;
        }

        let covered = buffer.count_covered();
        self.totals.overall_sites_covered += covered;

        if role == ContigRole::Y && self.chr_y_restricted_coverage.is_none() {
            let fraction = self
                .config
                .y_window
                .bounds(length)
                .map(|(from, to)| buffer.covered_fraction(from, to))
                .unwrap_or(0.0);
            self.chr_y_restricted_coverage = Some(fraction);
        }

        debug!(contig = %name, covered, "finalized contig");
        self.ledger.release(buffer.slots());
        Ok(())
    }
}
