use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::QcError;

/// Region qualifier of a `chrom:start-end` list key.
///
/// Parsed and kept for reference; coverage is never partitioned by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// 1-based start
    pub start: u64,
    /// 1-based inclusive end
    pub end: u64,
}

/// One site file registered for a chromosome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSource {
    /// Path to the VCF/BCF holding the sites
    pub path: PathBuf,
    /// Region qualifier from the list key, if any
    pub region: Option<Region>,
}

/// Chromosome → site sources, with consume-once semantics.
///
/// Loaded from a list of `<chrom>[:<start>-<end>]\t<path>` lines. Multiple
/// lines for the same chromosome accumulate in file order.
#[derive(Debug, Clone, Default)]
pub struct KnownSitesIndex {
    entries: BTreeMap<String, Vec<SiteSource>>,
}

impl KnownSitesIndex {
    /// Empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the list file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, QcError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| QcError::ListIo {
            path: path.to_path_buf(),
            source,
        })?;
        let index = Self::from_reader(BufReader::new(file), path)?;
        tracing::info!(
            path = %path.display(),
            chromosomes = index.len(),
            sources = index.source_count(),
            "loaded known-sites list"
        );
        Ok(index)
    }

    /// Parse list lines from `reader`; `origin` names the list in errors.
    pub fn from_reader<R: BufRead>(reader: R, origin: &Path) -> Result<Self, QcError> {
        let mut index = Self::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| QcError::ListIo {
                path: origin.to_path_buf(),
                source,
            })?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            let malformed = |message: String| QcError::Config {
                path: origin.to_path_buf(),
                line: line_no + 1,
                message,
            };
            if fields.len() != 2 {
                return Err(malformed(format!(
                    "expected 2 tab-separated fields, found {}",
                    fields.len()
                )));
            }
            if fields[0].is_empty() || fields[1].is_empty() {
                return Err(malformed("empty chromosome key or source path".into()));
            }

            let (chrom, region) = parse_key(fields[0]);
            index.insert(
                chrom,
                SiteSource {
                    path: PathBuf::from(fields[1]),
                    region,
                },
            );
        }
        Ok(index)
    }

    /// Register a source under `chrom`.
    pub fn insert(&mut self, chrom: impl Into<String>, source: SiteSource) {
        self.entries.entry(chrom.into()).or_default().push(source);
    }

    /// Remove and return the sources for `chrom`.
    ///
    /// A second call for the same chromosome returns `None`.
    pub fn take(&mut self, chrom: &str) -> Option<Vec<SiteSource>> {
        self.entries.remove(chrom)
    }

    /// Remove and yield every entry never taken, in chromosome-name order.
    pub fn drain_remaining(&mut self) -> impl Iterator<Item = (String, Vec<SiteSource>)> {
        std::mem::take(&mut self.entries).into_iter()
    }

    /// Chromosomes still registered.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no chromosome is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total sources across all chromosomes.
    pub fn source_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

/// Split `chrom:start-end` into the chromosome and its region.
///
/// Keys whose suffix is not a numeric range (e.g. `HLA-A*01:01`) are kept
/// whole.
fn parse_key(key: &str) -> (String, Option<Region>) {
    let parsed = key.rsplit_once(':').and_then(|(chrom, range)| {
        let (start, end) = range.split_once('-')?;
        let region = Region {
            start: start.parse().ok()?,
            end: end.parse().ok()?,
        };
        (!chrom.is_empty()).then(|| (chrom.to_string(), Some(region)))
    });
    parsed.unwrap_or_else(|| (key.to_string(), None))
}
