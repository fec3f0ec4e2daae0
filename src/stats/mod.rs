//! Streaming aggregation and derived statistics.
//!
//! [`StatisticsAggregator`] owns the per-record loop and the running totals.
//! [`QcSummary`] is what remains after the pass; effective coverage, depth
//! ratios and the sex call are computed from it on demand.

mod aggregator;
mod metrics;
mod sex;
mod summary;
mod totals;

pub use aggregator::StatisticsAggregator;
pub use metrics::{effective_coverage, Metric, MetricDisplay};
pub use sex::{call_sex, xy_depth_ratio, Sex, SexCall, SexThresholds};
pub use summary::{ChromosomeDepth, QcSummary};
pub use totals::RunningTotals;
