use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rust_htslib::bcf::{self, Read};

use crate::QcError;

/// A known-site position decoded from a site source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownSite {
    /// Chromosome named by the record
    pub contig: Arc<str>,
    /// 1-based position
    pub position: u64,
}

impl KnownSite {
    /// Construct a site.
    pub fn new(contig: impl Into<Arc<str>>, position: u64) -> Self {
        Self {
            contig: contig.into(),
            position,
        }
    }
}

/// Lazily consumed sequence of sites from one source.
pub type SiteStream<'a> = Box<dyn Iterator<Item = Result<KnownSite, QcError>> + 'a>;

/// Opens site sources for the joiner. Each source is opened once and read
/// front to back.
pub trait SiteProvider {
    /// Open `source` and stream its sites.
    fn open(&mut self, source: &Path) -> Result<SiteStream<'_>, QcError>;
}

/// Site provider reading VCF, bgzipped VCF or BCF through htslib.
#[derive(Debug, Clone, Copy, Default)]
pub struct VcfSiteProvider;

impl VcfSiteProvider {
    /// Create a provider.
    pub fn new() -> Self {
        Self
    }
}

impl SiteProvider for VcfSiteProvider {
    fn open(&mut self, source: &Path) -> Result<SiteStream<'_>, QcError> {
        let reader = bcf::Reader::from_path(source).map_err(|err| QcError::Htslib {
            path: source.to_path_buf(),
            source: err,
        })?;
        let record = reader.empty_record();
        Ok(Box::new(VcfSites {
            path: source.to_path_buf(),
            reader,
            record,
            last_contig: None,
        }))
    }
}

struct VcfSites {
    path: PathBuf,
    reader: bcf::Reader,
    record: bcf::Record,
    last_contig: Option<(u32, Arc<str>)>,
}

impl VcfSites {
    fn htslib_error(&self, source: rust_htslib::errors::Error) -> QcError {
        QcError::Htslib {
            path: self.path.clone(),
            source,
        }
    }

    fn contig_name(&mut self) -> Result<Arc<str>, QcError> {
        let Some(rid) = self.record.rid() else {
            return Ok(Arc::from("."));
        };
        if let Some((last_rid, name)) = &self.last_contig {
            if *last_rid == rid {
                return Ok(Arc::clone(name));
            }
        }
        let name: Arc<str> = match self.record.header().rid2name(rid) {
            Ok(bytes) => Arc::from(String::from_utf8_lossy(bytes).as_ref()),
            Err(err) => return Err(self.htslib_error(err)),
        };
        self.last_contig = Some((rid, Arc::clone(&name)));
        Ok(name)
    }
}

impl Iterator for VcfSites {
    type Item = Result<KnownSite, QcError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Err(err) = self.reader.read(&mut self.record)? {
            return Some(Err(self.htslib_error(err)));
        }
        let site = self.contig_name().map(|contig| KnownSite {
            contig,
            position: (self.record.pos() + 1).max(0) as u64,
        });
        Some(site)
    }
}

/// In-memory site provider.
///
/// Counts how often each source is opened so callers can check that no
/// source is read twice.
#[derive(Debug, Default)]
pub struct MemorySiteProvider {
    sources: HashMap<PathBuf, Vec<KnownSite>>,
    opened: HashMap<PathBuf, usize>,
}

impl MemorySiteProvider {
    /// Empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the sites served for `path`.
    pub fn insert(&mut self, path: impl Into<PathBuf>, sites: Vec<KnownSite>) {
        self.sources.insert(path.into(), sites);
    }

    /// Builder form of [`MemorySiteProvider::insert`].
    pub fn with_source(mut self, path: impl Into<PathBuf>, sites: Vec<KnownSite>) -> Self {
        self.insert(path, sites);
        self
    }

    /// How many times `path` has been opened.
    pub fn open_count(&self, path: &Path) -> usize {
        self.opened.get(path).copied().unwrap_or(0)
    }
}

impl SiteProvider for MemorySiteProvider {
    fn open(&mut self, source: &Path) -> Result<SiteStream<'_>, QcError> {
        *self.opened.entry(source.to_path_buf()).or_insert(0) += 1;
        let sites = self.sources.get(source).ok_or_else(|| QcError::Io {
            path: source.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such site source"),
        })?;
        Ok(Box::new(sites.iter().cloned().map(Ok::<_, QcError>)))
    }
}

impl<P: SiteProvider + ?Sized> SiteProvider for &mut P {
    fn open(&mut self, source: &Path) -> Result<SiteStream<'_>, QcError> {
        (**self).open(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const VCF: &str = "\
##fileformat=VCFv4.2
##contig=<ID=chr1,length=1000>
##contig=<ID=chr2,length=500>
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO
chr1\t10\t.\tA\tG\t.\t.\t.
chr1\t25\t.\tC\tT\t.\t.\t.
chr2\t7\t.\tG\tA\t.\t.\t.
";

    #[test]
    fn vcf_provider_streams_one_based_positions() {
        let mut file = tempfile::Builder::new()
            .suffix(".vcf")
            .tempfile()
            .expect("create temp VCF");
        file.write_all(VCF.as_bytes()).expect("write VCF");
        file.flush().expect("flush VCF");

        let mut provider = VcfSiteProvider::new();
        let sites: Vec<KnownSite> = provider
            .open(file.path())
            .expect("open VCF")
            .collect::<Result<_, _>>()
            .expect("decode VCF");

        assert_eq!(
            sites,
            vec![
                KnownSite::new("chr1", 10),
                KnownSite::new("chr1", 25),
                KnownSite::new("chr2", 7),
            ]
        );
    }

    #[test]
    fn vcf_provider_reports_missing_file() {
        let mut provider = VcfSiteProvider::new();
        let result = provider.open(Path::new("/nonexistent/sites.vcf.gz"));
        assert!(matches!(result, Err(QcError::Htslib { .. })));
    }

    #[test]
    fn memory_provider_counts_opens() {
        let mut provider =
            MemorySiteProvider::new().with_source("a.vcf", vec![KnownSite::new("chr1", 3)]);
        let sites: Vec<_> = provider.open(Path::new("a.vcf")).unwrap().collect();
        assert_eq!(sites.len(), 1);
        assert_eq!(provider.open_count(Path::new("a.vcf")), 1);
        assert!(provider.open(Path::new("b.vcf")).is_err());
    }
}
