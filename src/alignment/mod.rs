//! Alignment-stream collaborator.
//!
//! The aggregator never touches a file format directly: it pulls
//! [`AlignmentRecord`]s from an [`AlignmentSource`]. [`BamSource`] adapts
//! htslib; [`MemorySource`] serves pre-built records for tests and tooling.

mod bam;
mod types;

pub use bam::BamSource;
pub use types::{AlignmentRecord, ContigTable, ReadFlags, SortOrder};

use crate::QcError;

/// Sequential supplier of decoded alignment records.
pub trait AlignmentSource {
    /// Contig names and lengths from the header.
    fn contigs(&self) -> &ContigTable;

    /// Sort order declared by the header.
    fn sort_order(&self) -> SortOrder;

    /// Next record, or `None` at end of stream.
    fn next_record(&mut self) -> Option<Result<AlignmentRecord, QcError>>;
}

/// In-memory alignment source.
#[derive(Debug, Clone)]
pub struct MemorySource {
    contigs: ContigTable,
    sort_order: SortOrder,
    records: std::vec::IntoIter<AlignmentRecord>,
}

impl MemorySource {
    /// Serve `records` in order under a coordinate-sorted header.
    pub fn new(contigs: ContigTable, records: Vec<AlignmentRecord>) -> Self {
        Self {
            contigs,
            sort_order: SortOrder::Coordinate,
            records: records.into_iter(),
        }
    }

    /// Override the declared sort order.
    pub fn with_sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }
}

impl AlignmentSource for MemorySource {
    fn contigs(&self) -> &ContigTable {
        &self.contigs
    }

    fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    fn next_record(&mut self) -> Option<Result<AlignmentRecord, QcError>> {
        self.records.next().map(Ok)
    }
}
