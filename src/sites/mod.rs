//! Known-site panel: list index, site sources and the coverage joiner.
//!
//! The list maps chromosomes to site files. Each chromosome's files are
//! taken from the index exactly once, either when its coverage buffer is
//! joined or in the end-of-run remainder pass.

mod index;
mod joiner;
mod provider;

pub use index::{KnownSitesIndex, Region, SiteSource};
pub use joiner::{CoverageJoiner, JoinDelta};
pub use provider::{KnownSite, MemorySiteProvider, SiteProvider, SiteStream, VcfSiteProvider};
