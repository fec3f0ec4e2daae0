/// Counters accumulated over the streaming pass.
///
/// Every field only grows (`min_read_length` only shrinks once set).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct RunningTotals {
    /// Reads counted (secondary alignments only when configured)
    pub total_reads: u64,
    /// Bases of counted reads
    pub total_bases: u64,
    /// Counted reads that are mapped and not duplicates
    pub aligned_reads: u64,
    /// Counted reads flagged as duplicates
    pub duplicated_reads: u64,
    /// Secondary or supplementary alignments seen
    pub secondary_alignments: u64,
    /// Aligned reference bases marked, overlaps included
    pub bases_mapped_overall: u64,
    /// Read bases on the X chromosome, any flags
    pub bases_mapped_chr_x: u64,
    /// Read bases on the Y chromosome, any flags
    pub bases_mapped_chr_y: u64,
    /// Distinct known sites on listed chromosomes
    pub known_sites_total: u64,
    /// Distinct known sites covered by at least one aligned read
    pub known_sites_covered: u64,
    /// Genome positions covered by at least one aligned read
    pub overall_sites_covered: u64,
    /// Shortest counted read
    pub min_read_length: Option<u32>,
    /// Longest counted read
    pub max_read_length: u32,
}

impl RunningTotals {
    /// Count one read of `read_length` bases.
    pub fn record_read(&mut self, read_length: u32) {
        self.total_reads += 1;
        self.total_bases += u64::from(read_length);
        self.max_read_length = self.max_read_length.max(read_length);
        self.min_read_length = Some(
            self.min_read_length
                .map_or(read_length, |min| min.min(read_length)),
        );
    }
}
