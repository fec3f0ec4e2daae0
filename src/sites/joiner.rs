use std::collections::HashSet;

use super::{SiteProvider, SiteSource};
use crate::coverage::CoverageBuffer;
use crate::QcError;

/// Known-site counts produced by one join.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinDelta {
    /// Distinct known-site positions on the chromosome
    pub total: u64,
    /// Distinct positions that are covered
    pub covered: u64,
}

/// Intersects finalized coverage buffers with known-site sources.
#[derive(Debug)]
pub struct CoverageJoiner<P> {
    provider: P,
}

impl<P: SiteProvider> CoverageJoiner<P> {
    /// Create a joiner reading sites through `provider`.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Count distinct sites of `chrom` across `sources` and how many of them
    /// `buffer` covers.
    pub fn join(
        &mut self,
        chrom: &str,
        buffer: &CoverageBuffer,
        sources: &[SiteSource],
    ) -> Result<JoinDelta, QcError> {
        let positions = self.distinct_positions(chrom, sources)?;
        let covered = positions
            .iter()
            .filter(|&&pos| buffer.is_covered(pos))
            .count() as u64;
        tracing::debug!(chrom, total = positions.len(), covered, "joined known sites");
        Ok(JoinDelta {
            total: positions.len() as u64,
            covered,
        })
    }

    /// Count distinct sites of a chromosome that produced no coverage.
    pub fn join_remainder(&mut self, chrom: &str, sources: &[SiteSource]) -> Result<u64, QcError> {
        let total = self.distinct_positions(chrom, sources)?.len() as u64;
        tracing::debug!(chrom, total, "counted uncovered known sites");
        Ok(total)
    }

    /// Consume the joiner and hand back the provider.
    pub fn into_provider(self) -> P {
        self.provider
    }

    fn distinct_positions(
        &mut self,
        chrom: &str,
        sources: &[SiteSource],
    ) -> Result<HashSet<u64>, QcError> {
        let mut positions = HashSet::new();
        for source in sources {
            for site in self.provider.open(&source.path)? {
                let site = site?;
                if site.contig.as_ref() != chrom {
                    return Err(QcError::ContigMismatch {
                        expected: chrom.to_string(),
                        found: site.contig.to_string(),
                        source_path: source.path.clone(),
                    });
                }
                positions.insert(site.position);
            }
        }
        Ok(positions)
    }
}
