use bitvec::prelude::*;

/// Dense per-position coverage flags for one contig.
///
/// Index `i` holds position `i` (1-based), so the buffer has `length + 1`
/// slots and slot 0 is never marked. The buffer is sized once and never grows.
#[derive(Debug, Clone)]
pub struct CoverageBuffer {
    bits: BitVec<usize, Lsb0>,
}

impl CoverageBuffer {
    /// Allocate `length + 1` uncovered slots.
    pub fn new(length: usize) -> Self {
        debug_assert!(length > 0, "contig length must be positive");
        Self {
            bits: bitvec![usize, Lsb0; 0; length + 1],
        }
    }

    /// Contig length this buffer was sized for.
    pub fn contig_length(&self) -> usize {
        self.bits.len() - 1
    }

    /// Number of slots held, including the unused slot 0.
    pub fn slots(&self) -> usize {
        self.bits.len()
    }

    /// Mark every position in `[start, end]` and return how many positions
    /// were visited (re-marked positions count again).
    ///
    /// Callers clip to `1 ≤ start ≤ end ≤ length` first.
    pub fn mark_range(&mut self, start: usize, end: usize) -> u64 {
        debug_assert!(start >= 1 && start <= end && end <= self.contig_length());
        self.bits[start..=end].fill(true);
        (end - start + 1) as u64
    }

    /// Number of covered positions.
    pub fn count_covered(&self) -> u64 {
        self.bits.count_ones() as u64
    }

    /// Whether `pos` is covered; positions outside the buffer are not.
    #[inline]
    pub fn is_covered(&self, pos: u64) -> bool {
        usize::try_from(pos)
            .ok()
            .and_then(|idx| self.bits.get(idx).map(|bit| *bit))
            .unwrap_or(false)
    }

    /// Fraction of covered slots in the half-open index range `[from, to)`.
    pub fn covered_fraction(&self, from: usize, to: usize) -> f64 {
        let to = to.min(self.bits.len());
        if from >= to {
            return 0.0;
        }
        self.bits[from..to].count_ones() as f64 / (to - from) as f64
    }
}
