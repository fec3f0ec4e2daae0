//! # Streaming BAM quality control
//!
//! This library computes quality-control statistics for a sequencing run in a
//! single bounded-memory pass over a coordinate-sorted alignment stream.
//!
//! ## Core Algorithm
//!
//! 1. **Per-contig coverage**: a bitmap of covered positions is built for the
//!    contig currently being streamed and released as soon as the contig changes
//! 2. **Known-sites join**: each finalized bitmap is intersected with the known
//!    variant positions registered for that contig, deduplicated across files
//! 3. **Remainder pass**: contigs never covered still contribute their known
//!    sites to the denominator
//! 4. **Derived metrics**: effective coverage `-ln(1 - covered/total)` and a
//!    sex call from X/Y depth and restricted chrY coverage
//!
//! Peak memory = O(longest contig), never O(genome).
//!
//! ## Usage Example
//!
//! ```ignore
//! use bamqc::{run_qc, QcConfig};
//! use bamqc::alignment::BamSource;
//! use bamqc::sites::{KnownSitesIndex, VcfSiteProvider};
//!
//! let config = QcConfig::default();
//! let index = KnownSitesIndex::load("sites.list")?;
//! let mut source = BamSource::from_path("sample.bam")?;
//! let summary = run_qc(&config, index, VcfSiteProvider::new(), &mut source)?;
//! println!("{}", summary.effective_coverage());
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

pub mod alignment; // Alignment records, contig metadata, BAM adapter
pub mod config;    // Immutable run configuration
pub mod coverage;  // Per-contig coverage bitmap and buffer accounting
pub mod report;    // Plain-text report rendering
pub mod sites;     // Known-sites index, site providers, coverage joiner
pub mod stats;     // Streaming aggregator and derived metrics

// Re-exports for convenience
pub use alignment::{AlignmentRecord, AlignmentSource, ContigTable, ReadFlags, SortOrder};
pub use config::{ContigRole, ContigRoleTable, QcConfig, RestrictedWindow, SortPolicy};
pub use coverage::{BufferLedger, CoverageBuffer};
pub use sites::{CoverageJoiner, KnownSitesIndex, SiteProvider};
pub use stats::{Metric, QcSummary, RunningTotals, Sex, SexCall, StatisticsAggregator};

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during a QC run
#[derive(Error, Debug)]
pub enum QcError {
    /// Known-sites list line with the wrong number of fields
    #[error("{path}:{line}: malformed known-sites entry: {message}")]
    Config {
        /// List file being parsed
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// What was wrong with the line
        message: String,
    },

    /// Known-sites list could not be read
    #[error("cannot read known-sites list {path}")]
    ListIo {
        /// List file path
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },

    /// A site record names a different chromosome than its list key
    #[error("site source {source_path} yielded a record on {found} while registered for {expected}")]
    ContigMismatch {
        /// Chromosome the source was registered under
        expected: String,
        /// Chromosome found in the site record
        found: String,
        /// Offending site source
        source_path: PathBuf,
    },

    /// Contig revisited after the stream moved past it
    #[error("alignment stream revisits contig {contig}; input must be coordinate-sorted")]
    UnsortedInput {
        /// Revisited contig
        contig: String,
    },

    /// Alignment record references a contig missing from the header
    #[error("alignment record references contig {0} which is not in the header")]
    UnknownContig(String),

    /// Plain I/O failure on an input or output path
    #[error("I/O failure on {path}")]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },

    /// htslib failed to open or decode an alignment or site source
    #[error("htslib failure on {path}")]
    Htslib {
        /// Path being accessed
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: rust_htslib::errors::Error,
    },
}

/// Coarse classification of [`QcError`], used to pick the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad configuration, detected before streaming starts
    Config,
    /// Inputs disagree with each other (naming, ordering)
    Contract,
    /// An input could not be opened or decoded
    Input,
}

impl ErrorKind {
    /// Process exit code for this kind of failure
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Input => 1,
            ErrorKind::Config => 2,
            ErrorKind::Contract => 3,
        }
    }
}

impl QcError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            QcError::Config { .. } | QcError::ListIo { .. } => ErrorKind::Config,
            QcError::ContigMismatch { .. } | QcError::UnsortedInput { .. } => ErrorKind::Contract,
            QcError::UnknownContig(_) | QcError::Io { .. } | QcError::Htslib { .. } => {
                ErrorKind::Input
            }
        }
    }
}

/// Run the whole QC pass: stream every record, finalize, and derive metrics.
///
/// The alignment stream is read exactly once. Each known-site source is
/// opened at most once.
pub fn run_qc<P, A>(
    config: &QcConfig,
    index: KnownSitesIndex,
    provider: P,
    source: &mut A,
) -> Result<QcSummary, QcError>
where
    P: SiteProvider,
    A: AlignmentSource,
{
    let started = std::time::Instant::now();

    match source.sort_order() {
        SortOrder::Coordinate => {}
        SortOrder::Unknown => {
            tracing::warn!("alignment header does not declare a sort order; assuming coordinate")
        }
        other => tracing::warn!(
            sort_order = ?other,
            "according to the header the alignments are not sorted by coordinate"
        ),
    }

    let mut aggregator =
        StatisticsAggregator::new(config, index, provider, source.contigs().clone());
    while let Some(record) = source.next_record() {
        aggregator.observe(&record?)?;
    }
    let summary = aggregator.finish()?;

    tracing::info!(
        elapsed_secs = started.elapsed().as_secs_f64(),
        "analysis finished"
    );
    Ok(summary)
}
