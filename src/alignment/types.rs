use std::collections::HashMap;
use std::sync::Arc;

/// Flags that decide how a record is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadFlags {
    /// Secondary (0x100) or supplementary (0x800) alignment.
    pub secondary_or_supplementary: bool,
    /// PCR/optical duplicate (0x400).
    pub duplicate: bool,
    /// Read unmapped (0x4).
    pub unmapped: bool,
}

impl ReadFlags {
    /// Primary, non-duplicate, mapped.
    pub fn primary() -> Self {
        Self::default()
    }

    /// Build from a raw SAM flag word.
    pub fn from_sam_flags(flags: u16) -> Self {
        Self {
            secondary_or_supplementary: flags & (0x100 | 0x800) != 0,
            duplicate: flags & 0x400 != 0,
            unmapped: flags & 0x4 != 0,
        }
    }
}

/// Decoded alignment record as seen by the aggregator.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentRecord {
    /// Reference contig name, `None` for unplaced reads.
    pub contig: Option<Arc<str>>,
    /// 1-based leftmost aligned reference position.
    pub start: u64,
    /// 1-based rightmost aligned reference position (inclusive).
    pub end: u64,
    /// Number of bases in the read sequence.
    pub read_length: u32,
    /// Classification flags.
    pub flags: ReadFlags,
}

impl AlignmentRecord {
    /// Construct a primary mapped record spanning `[start, end]`.
    pub fn mapped(contig: impl Into<Arc<str>>, start: u64, end: u64, read_length: u32) -> Self {
        Self {
            contig: Some(contig.into()),
            start,
            end,
            read_length,
            flags: ReadFlags::primary(),
        }
    }

    /// Construct an unmapped record with no placement.
    pub fn unplaced(read_length: u32) -> Self {
        Self {
            contig: None,
            start: 0,
            end: 0,
            read_length,
            flags: ReadFlags {
                unmapped: true,
                ..ReadFlags::default()
            },
        }
    }

    /// Replace the classification flags.
    pub fn with_flags(mut self, flags: ReadFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Contig name as a string slice.
    pub fn contig_name(&self) -> Option<&str> {
        self.contig.as_deref()
    }
}

/// Sort order declared in the alignment header (`@HD SO:`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// `SO:coordinate`
    Coordinate,
    /// `SO:queryname`
    Queryname,
    /// `SO:unsorted`
    Unsorted,
    /// Missing `@HD` line, missing `SO` tag or a non-standard value.
    Unknown,
}

impl SortOrder {
    /// Extract the sort order from SAM header text.
    pub fn from_header_text(text: &str) -> Self {
        let Some(hd) = text.lines().find(|line| line.starts_with("@HD")) else {
            return SortOrder::Unknown;
        };
        match hd.split('\t').find_map(|field| field.strip_prefix("SO:")) {
            Some("coordinate") => SortOrder::Coordinate,
            Some("queryname") => SortOrder::Queryname,
            Some("unsorted") => SortOrder::Unsorted,
            _ => SortOrder::Unknown,
        }
    }
}

/// Contig names and lengths from the alignment header, in header order.
#[derive(Debug, Clone, Default)]
pub struct ContigTable {
    contigs: Vec<(Arc<str>, usize)>,
    by_name: HashMap<Arc<str>, usize>,
}

impl ContigTable {
    /// Build a table from `(name, length)` pairs.
    pub fn new<I, S>(contigs: I) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<Arc<str>>,
    {
        let contigs: Vec<(Arc<str>, usize)> = contigs
            .into_iter()
            .map(|(name, len)| (name.into(), len))
            .collect();
        let by_name = contigs
            .iter()
            .enumerate()
            .map(|(idx, (name, _))| (Arc::clone(name), idx))
            .collect();
        Self { contigs, by_name }
    }

    /// Length of the named contig.
    pub fn length(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).map(|&idx| self.contigs[idx].1)
    }

    /// Name of the contig with the given header index.
    pub fn name(&self, tid: usize) -> Option<&Arc<str>> {
        self.contigs.get(tid).map(|(name, _)| name)
    }

    /// Sum of all contig lengths.
    pub fn genome_length(&self) -> u64 {
        self.contigs.iter().map(|&(_, len)| len as u64).sum()
    }

    /// Number of contigs.
    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    /// Whether the header declared no contigs.
    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }
}
