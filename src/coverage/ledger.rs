//! Buffer accounting for the bounded-memory contract

/// Tracks coverage-buffer allocations across a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct BufferLedger {
    /// Buffers currently alive
    live: usize,

    /// Slots currently alive
    live_slots: usize,

    /// Maximum live buffers seen
    peak_live: usize,

    /// Maximum live slots seen
    peak_slots: usize,

    /// Buffers allocated over the run
    allocations: usize,
}

impl BufferLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a buffer allocation of `slots` flags
    pub fn allocate(&mut self, slots: usize) {
        self.live += 1;
        self.live_slots += slots;
        self.allocations += 1;
        self.peak_live = self.peak_live.max(self.live);
        self.peak_slots = self.peak_slots.max(self.live_slots);
    }

    /// Record that a buffer of `slots` flags was dropped
    pub fn release(&mut self, slots: usize) {
        self.live = self.live.saturating_sub(1);
        self.live_slots = self.live_slots.saturating_sub(slots);
    }

    /// Buffers currently alive
    pub fn live(&self) -> usize {
        self.live
    }

    /// Maximum simultaneously live buffers
    pub fn peak_live(&self) -> usize {
        self.peak_live
    }

    /// Maximum simultaneously live slots
    pub fn peak_slots(&self) -> usize {
        self.peak_slots
    }

    /// Total allocations
    pub fn allocations(&self) -> usize {
        self.allocations
    }
}
