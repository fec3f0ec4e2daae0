//! Per-contig coverage bitmap and buffer accounting
//!
//! Exactly one [`CoverageBuffer`] is alive at any time, so peak memory is
//! bounded by the longest contig. [`BufferLedger`] records allocations so the
//! bound can be checked after a run.

mod buffer;
mod ledger;

pub use buffer::CoverageBuffer;
pub use ledger::BufferLedger;
