//! Run configuration
//!
//! A [`QcConfig`] is built once (by the binary, from command-line arguments)
//! and handed to the aggregator by reference. Nothing reads ambient state.

use crate::stats::SexThresholds;

/// Leading chrY positions excluded from the restricted coverage window.
///
/// Covers the PAR1 pseudoautosomal region of GRCh37/GRCh38 chrY
/// (positions 1..=2_781_479), which is shared with chrX.
pub const CHR_Y_LEADING_EXCLUSION: usize = 2_781_480;

/// Trailing chrY positions excluded from the restricted coverage window.
///
/// Covers PAR2 plus the low-complexity tail of chrY.
pub const CHR_Y_TRAILING_EXCLUSION: usize = 330_000;

/// How a contig participates in sex inference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum ContigRole {
    /// Any contig that is not a sex chromosome
    Other,
    /// The X chromosome
    X,
    /// The Y chromosome
    Y,
}

/// Exact-name lookup from contig name to [`ContigRole`].
///
/// Names are matched exactly, so `chrUn_KI270X` or `HLA-DRB1*04:0Y` never
/// count as sex chromosomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContigRoleTable {
    x_names: Vec<String>,
    y_names: Vec<String>,
}

impl ContigRoleTable {
    /// Build a table from explicit name lists
    pub fn new<X, Y>(x_names: X, y_names: Y) -> Self
    where
        X: IntoIterator,
        X::Item: Into<String>,
        Y: IntoIterator,
        Y::Item: Into<String>,
    {
        Self {
            x_names: x_names.into_iter().map(Into::into).collect(),
            y_names: y_names.into_iter().map(Into::into).collect(),
        }
    }

    /// Replace the X chromosome names
    pub fn with_x_names<I: IntoIterator<Item = String>>(mut self, names: I) -> Self {
        self.x_names = names.into_iter().collect();
        self
    }

    /// Replace the Y chromosome names
    pub fn with_y_names<I: IntoIterator<Item = String>>(mut self, names: I) -> Self {
        self.y_names = names.into_iter().collect();
        self
    }

    /// Role of the named contig
    pub fn role(&self, contig: &str) -> ContigRole {
        if self.x_names.iter().any(|name| name == contig) {
            ContigRole::X
        } else if self.y_names.iter().any(|name| name == contig) {
            ContigRole::Y
        } else {
            ContigRole::Other
        }
    }
}

impl Default for ContigRoleTable {
    /// UCSC (`chrX`) and Ensembl/NCBI (`X`) naming
    fn default() -> Self {
        Self::new(["X", "chrX"], ["Y", "chrY"])
    }
}

/// Index window of the chrY coverage buffer used for restricted coverage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestrictedWindow {
    /// Positions excluded from the start of the contig
    pub leading: usize,
    /// Positions excluded from the end of the contig
    pub trailing: usize,
}

impl RestrictedWindow {
    /// Half-open index range `[leading, length - trailing)`, or `None` when empty
    pub fn bounds(&self, contig_length: usize) -> Option<(usize, usize)> {
        let end = contig_length.checked_sub(self.trailing)?;
        (self.leading < end).then_some((self.leading, end))
    }
}

impl Default for RestrictedWindow {
    fn default() -> Self {
        Self {
            leading: CHR_Y_LEADING_EXCLUSION,
            trailing: CHR_Y_TRAILING_EXCLUSION,
        }
    }
}

/// What to do when the alignment stream revisits a contig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortPolicy {
    /// Log a warning and keep going (known sites are still joined once)
    #[default]
    Warn,
    /// Abort with [`crate::QcError::UnsortedInput`]
    Strict,
}

/// Configuration parameters for a QC run
#[derive(Debug, Clone, Default)]
pub struct QcConfig {
    /// Count secondary/supplementary alignments as reads
    pub count_secondary_reads: bool,

    /// Which contigs are X and Y
    pub sex_chromosomes: ContigRoleTable,

    /// chrY window for restricted coverage
    pub y_window: RestrictedWindow,

    /// Decision thresholds for the sex call
    pub sex_thresholds: SexThresholds,

    /// Reaction to unsorted input
    pub sort_policy: SortPolicy,
}
