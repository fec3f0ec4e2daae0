use std::path::{Path, PathBuf};
use std::sync::Arc;

use rust_htslib::bam::{self, Read};

use super::{AlignmentRecord, AlignmentSource, ContigTable, ReadFlags, SortOrder};
use crate::QcError;

/// Alignment source backed by htslib (BAM, SAM or CRAM).
///
/// Records are decoded into a single reused buffer and converted one at a
/// time, so the file is streamed front to back exactly once.
pub struct BamSource {
    path: PathBuf,
    reader: bam::Reader,
    contigs: ContigTable,
    sort_order: SortOrder,
    record: bam::Record,
}

impl std::fmt::Debug for BamSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BamSource")
            .field("path", &self.path)
            .field("contigs", &self.contigs.len())
            .field("sort_order", &self.sort_order)
            .finish()
    }
}

impl BamSource {
    /// Open an alignment file and read its header.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, QcError> {
        let path = path.as_ref().to_path_buf();
        let reader = bam::Reader::from_path(&path).map_err(|source| QcError::Htslib {
            path: path.clone(),
            source,
        })?;

        let header = reader.header();
        let contigs = ContigTable::new((0..header.target_count()).map(|tid| {
            let name = String::from_utf8_lossy(header.tid2name(tid)).into_owned();
            let len = header.target_len(tid).unwrap_or(0) as usize;
            (name, len)
        }));
        let sort_order = SortOrder::from_header_text(&String::from_utf8_lossy(header.as_bytes()));

        tracing::debug!(path = %path.display(), contigs = contigs.len(), ?sort_order, "opened alignments");

        Ok(Self {
            path,
            reader,
            contigs,
            sort_order,
            record: bam::Record::new(),
        })
    }

    fn convert(&self) -> AlignmentRecord {
        let record = &self.record;
        let contig = usize::try_from(record.tid())
            .ok()
            .and_then(|tid| self.contigs.name(tid))
            .map(Arc::clone);

        // htslib positions are 0-based; the half-open end equals the 1-based inclusive end.
        let start = (record.pos() + 1).max(0) as u64;
        let end = record.cigar().end_pos().max(0) as u64;

        AlignmentRecord {
            contig,
            start,
            end,
            read_length: record.seq_len() as u32,
            flags: ReadFlags::from_sam_flags(record.flags()),
        }
    }
}

impl AlignmentSource for BamSource {
    fn contigs(&self) -> &ContigTable {
        &self.contigs
    }

    fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    fn next_record(&mut self) -> Option<Result<AlignmentRecord, QcError>> {
        match self.reader.read(&mut self.record)? {
            Ok(()) => Some(Ok(self.convert())),
            Err(source) => Some(Err(QcError::Htslib {
                path: self.path.clone(),
                source,
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAM: &str = "\
@HD\tVN:1.6\tSO:coordinate
@SQ\tSN:chr1\tLN:1000
@SQ\tSN:chrY\tLN:500
r1\t0\tchr1\t10\t60\t5M\t*\t0\t0\tACGTA\tIIIII
r2\t1024\tchr1\t20\t60\t3M2S\t*\t0\t0\tACGTA\tIIIII
r3\t4\t*\t0\t0\t*\t*\t0\t0\tACG\tIII
";

    fn write_sam() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".sam")
            .tempfile()
            .expect("create temp SAM");
        file.write_all(SAM.as_bytes()).expect("write SAM");
        file.flush().expect("flush SAM");
        file
    }

    #[test]
    fn reads_header_and_records() {
        let file = write_sam();
        let mut source = BamSource::from_path(file.path()).expect("open SAM");

        assert_eq!(source.sort_order(), SortOrder::Coordinate);
        assert_eq!(source.contigs().length("chr1"), Some(1000));
        assert_eq!(source.contigs().length("chrY"), Some(500));

        let r1 = source.next_record().expect("r1").expect("decode r1");
        assert_eq!(r1.contig_name(), Some("chr1"));
        assert_eq!((r1.start, r1.end), (10, 14));
        assert_eq!(r1.read_length, 5);
        assert_eq!(r1.flags, ReadFlags::primary());

        let r2 = source.next_record().expect("r2").expect("decode r2");
        assert!(r2.flags.duplicate);
        assert_eq!((r2.start, r2.end), (20, 22));

        let r3 = source.next_record().expect("r3").expect("decode r3");
        assert_eq!(r3.contig, None);
        assert!(r3.flags.unmapped);
        assert_eq!(r3.read_length, 3);

        assert!(source.next_record().is_none());
    }

    #[test]
    fn missing_file_is_htslib_error() {
        let err = BamSource::from_path("/nonexistent/sample.bam").unwrap_err();
        assert!(matches!(err, QcError::Htslib { .. }));
    }
}
